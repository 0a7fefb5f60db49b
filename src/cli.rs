//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn markdown or an idea into a slide deck.
#[derive(Parser, Debug)]
#[command(name = "nexaplan", version, about, long_about = None)]
pub struct Cli {
    /// Log filter (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a markdown deck to a standalone HTML page
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Output HTML file (defaults to the input with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the page in the default browser
        #[arg(long)]
        open: bool,

        /// Copy the rendered slides to the clipboard
        #[arg(long)]
        copy: bool,

        /// Print the position records as JSON
        #[arg(long)]
        positions: bool,
    },

    /// Ask the model for a deck on a topic and render it
    Generate {
        /// What the presentation is about
        topic: String,

        /// Extra guidance for the model
        #[arg(short, long)]
        instructions: Option<String>,

        /// Output HTML file
        #[arg(short, long, default_value = "slides.html")]
        output: PathBuf,

        /// Also save the generated markdown
        #[arg(long, value_name = "MD")]
        markdown_out: Option<PathBuf>,

        /// Open the page in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Re-render a deck every time it is saved
    Watch {
        /// Markdown file to watch
        file: PathBuf,

        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show where a preview element points in the markdown
    Locate {
        /// Markdown file the preview was rendered from
        file: PathBuf,

        /// Value of the element's data-position attribute, e.g. 3-5
        position: String,

        /// Editor viewport height in pixels
        #[arg(long, default_value_t = 600.0)]
        viewport: f32,
    },

    /// Write the starter deck to a new file
    New {
        /// File to create
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show or create the configuration file
    Config {
        /// Print only the path of the configuration file
        #[arg(long)]
        path: bool,

        /// Write the current settings (defaults if none) to disk
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["nexaplan", "render", "deck.md", "-o", "out.html", "--positions"]);
        match cli.command {
            Command::Render {
                file,
                output,
                positions,
                open,
                ..
            } => {
                assert_eq!(file, PathBuf::from("deck.md"));
                assert_eq!(output, Some(PathBuf::from("out.html")));
                assert!(positions);
                assert!(!open);
            }
            other => panic!("Expected render command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_log_level_after_subcommand() {
        let cli = Cli::parse_from(["nexaplan", "locate", "deck.md", "3-5", "--log-level", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Locate { viewport, .. } if viewport == 600.0));
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["nexaplan", "generate", "Rust ownership"]);
        match cli.command {
            Command::Generate {
                topic,
                instructions,
                output,
                ..
            } => {
                assert_eq!(topic, "Rust ownership");
                assert!(instructions.is_none());
                assert_eq!(output, PathBuf::from("slides.html"));
            }
            other => panic!("Expected generate command, got {:?}", other),
        }
    }
}
