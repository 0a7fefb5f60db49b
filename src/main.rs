//! NexaPlan - Main Entry Point
//!
//! Renders markdown decks to standalone slide pages, drafts decks with a
//! hosted language model, and maps preview positions back to source lines.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use log::{error, info, warn};
use nexaplan::ai::GeminiClient;
use nexaplan::config::{
    get_config_file_path, load_config, save_config, save_config_silent, Settings,
};
use nexaplan::export::{copy_deck_to_clipboard, export_to_html_file, title_from_path};
use nexaplan::preview::HoverSync;
use nexaplan::session::Session;
use nexaplan::slides::DEFAULT_DECK;
use nexaplan::watch::{DeckEvent, DeckWatcher};
use nexaplan::{Error, GenerateAiSlidesParams, GenerateSlidesParams, Result, SlideService};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name constant.
const APP_NAME: &str = "NexaPlan";

/// Quiet period after a save before re-rendering.
const WATCH_SETTLE: Duration = Duration::from_millis(150);

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref());
    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initialize logging: `info` by default, `RUST_LOG` if set, `--log-level` over both.
fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = load_config();

    match cli.command {
        Command::Render {
            file,
            output,
            open,
            copy,
            positions,
        } => {
            let output = output.unwrap_or_else(|| file.with_extension("html"));
            let service = SlideService::from_settings(&settings);
            let result = service.generate_slides(&GenerateSlidesParams {
                markdown: &read_deck(&file)?,
            })?;

            export_to_html_file(&result, &output, title_from_path(&file))?;
            if positions {
                print_json(&result.positions)?;
            }
            if copy {
                copy_deck_to_clipboard(&result)?;
                info!("Copied slides to clipboard");
            }
            finish_export(&mut settings, Some(&file), &output, open);
            Ok(())
        }

        Command::Generate {
            topic,
            instructions,
            output,
            markdown_out,
            open,
        } => {
            let client = GeminiClient::from_env(&settings.ai)?;
            let instructions = instructions.or_else(|| settings.ai.default_instructions.clone());
            let mut session = Session::new(SlideService::from_settings(&settings));

            session.generate_ai(
                &client,
                &GenerateAiSlidesParams {
                    topic: &topic,
                    additional_instructions: instructions.as_deref(),
                },
            )?;
            let result = session.rendered();

            if let Some(md_path) = &markdown_out {
                write_file(md_path, &result.markdown)?;
                info!("Saved generated markdown to {}", md_path.display());
            }
            export_to_html_file(result, &output, Some(&topic))?;
            finish_export(&mut settings, markdown_out.as_deref(), &output, open);
            Ok(())
        }

        Command::Watch { file, output } => watch(&settings, &file, &output),

        Command::Locate {
            file,
            position,
            viewport,
        } => {
            let service = SlideService::from_settings(&settings);
            let result = service.generate_slides(&GenerateSlidesParams {
                markdown: &read_deck(&file)?,
            })?;

            let mut sync = HoverSync::from_settings(&settings.preview);
            sync.set_enabled(true);
            sync.update_positions(result.positions);
            let jump = sync
                .on_hover(&position, viewport)
                .ok_or_else(|| Error::Application(format!("Invalid position: {}", position)))?;
            print_json(&jump)
        }

        Command::New { file, force } => {
            if file.exists() && !force {
                return Err(Error::Application(format!(
                    "{} already exists; use --force to overwrite",
                    file.display()
                )));
            }
            write_file(&file, DEFAULT_DECK)?;
            info!("Created {}", file.display());
            Ok(())
        }

        Command::Config { path, init } => {
            let config_path = get_config_file_path()?;
            if init {
                save_config(&settings)?;
                info!("Wrote settings to {}", config_path.display());
            }
            if path {
                println!("{}", config_path.display());
                Ok(())
            } else {
                print_json(&settings)
            }
        }
    }
}

/// Re-render `file` into `output` on every save until the watcher stops.
fn watch(settings: &Settings, file: &Path, output: &Path) -> Result<()> {
    let watcher = DeckWatcher::new(file)?;
    let mut session = Session::new(SlideService::from_settings(settings));

    let render = |session: &mut Session| -> Result<()> {
        let markdown = read_deck(file)?;
        // Render failures are kept in the session; the last good page stays.
        if session.edit(markdown).is_ok() {
            export_to_html_file(session.rendered(), output, title_from_path(file))?;
        }
        Ok(())
    };

    render(&mut session)?;
    info!("Watching {} (Ctrl+C to stop)", file.display());

    while let Some(event) = watcher.wait_for_change(WATCH_SETTLE) {
        match event {
            DeckEvent::Changed => {
                if let Err(e) = render(&mut session) {
                    warn!("{}", e);
                }
            }
            DeckEvent::Removed => warn!("{} was removed", file.display()),
            DeckEvent::Error(msg) => warn!("File watcher error: {}", msg),
        }
    }
    Ok(())
}

/// Remember the deck and export directory, then optionally open the page.
fn finish_export(settings: &mut Settings, deck: Option<&Path>, output: &Path, open: bool) {
    if let Some(deck) = deck {
        settings.add_recent_deck(absolute(deck));
    }
    settings.last_export_directory = absolute(output).parent().map(Path::to_path_buf);
    save_config_silent(settings);

    if open || settings.open_after_export {
        if let Err(e) = open::that(output) {
            warn!("Failed to open {}: {}", output.display(), e);
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_deck(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
