//! Syntax Highlighting Module
//!
//! This module integrates syntect for code fence highlighting in rendered
//! slides. Highlighted code is emitted as inline-styled `<span>` elements so
//! the deck stays self-contained.

use log::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default theme; slides have a light background
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Fallback theme if the specified theme is not found
pub const FALLBACK_THEME: &str = "base16-ocean.light";

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter that caches syntect sets for performance.
///
/// Loading the syntax and theme sets is expensive, so a single instance is
/// shared through [`get_highlighter`].
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with default syntax and theme sets.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Get a theme by name, falling back to the bundled light themes.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(DEFAULT_THEME))
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Highlight `code` as HTML spans.
    ///
    /// Returns `None` when the language is unknown or highlighting fails, in
    /// which case the caller emits plain escaped text.
    pub fn highlight_html(&self, code: &str, language: &str, theme_name: &str) -> Option<String> {
        let syntax = self.find_syntax_for_language(language)?;
        let theme = self.get_theme(theme_name)?;
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut html = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            let ranges = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges,
                Err(e) => {
                    warn!("Failed to highlight {} code: {}", language, e);
                    return None;
                }
            };
            match styled_line_to_highlighted_html(&ranges[..], IncludeBackground::No) {
                Ok(line_html) => html.push_str(&line_html),
                Err(e) => {
                    warn!("Failed to convert highlighted line to HTML: {}", e);
                    return None;
                }
            }
        }

        Some(html)
    }

    /// Find syntax definition for a language identifier.
    ///
    /// Tries the common alias table, then the name, then a case-insensitive
    /// name match.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();

        let extension = match lang_lower.as_str() {
            "rust" | "rs" => "rs",
            "python" | "py" => "py",
            "javascript" | "js" => "js",
            "typescript" | "ts" => "ts",
            "c" => "c",
            "cpp" | "c++" | "cxx" => "cpp",
            "csharp" | "c#" | "cs" => "cs",
            "java" => "java",
            "go" | "golang" => "go",
            "ruby" | "rb" => "rb",
            "php" => "php",
            "html" | "htm" => "html",
            "css" => "css",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "xml" => "xml",
            "markdown" | "md" => "md",
            "sql" => "sql",
            "shell" | "sh" | "bash" | "zsh" => "sh",
            "diff" | "patch" => "diff",
            other => other,
        };

        if let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) {
            return Some(syntax);
        }

        if let Some(syntax) = self.syntax_set.find_syntax_by_name(language) {
            return Some(syntax);
        }

        let found = self
            .syntax_set
            .syntaxes()
            .iter()
            .find(|syntax| syntax.name.to_lowercase() == lang_lower);
        if found.is_none() {
            debug!("No syntax found for language: {}", language);
        }
        found
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

use std::sync::OnceLock;

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let html = get_highlighter()
            .highlight_html("fn main() {}\n", "rust", DEFAULT_THEME)
            .expect("rust is a bundled syntax");
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_returns_none() {
        assert!(get_highlighter()
            .highlight_html("whatever", "not-a-language", DEFAULT_THEME)
            .is_none());
        assert!(get_highlighter().highlight_html("x", "", DEFAULT_THEME).is_none());
    }

    #[test]
    fn test_highlighted_output_is_escaped() {
        let html = get_highlighter()
            .highlight_html("<div>&</div>\n", "html", DEFAULT_THEME)
            .expect("html is a bundled syntax");
        assert!(!html.contains("<div>"));
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(get_highlighter().get_theme("no-such-theme").is_some());
    }
}
