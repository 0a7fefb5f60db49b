//! User settings for NexaPlan
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::markdown::syntax::DEFAULT_THEME;
use crate::render::{HtmlOptions, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Generation Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Hosted model used for slide generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,

    /// API root without the `/v1beta/...` path
    pub base_url: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Request timeout in seconds; 0 disables the timeout
    pub request_timeout_secs: u64,

    /// Additional instructions used when none are given on the command line
    pub default_instructions: Option<String>,
}

impl AiSettings {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_API_KEY_ENV: &'static str = "GEMINI_API_KEY";
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key_env: Self::DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: 60,
            default_instructions: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// How markdown is turned into slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Pass raw HTML in the markdown through to the preview
    pub allow_html: bool,

    /// Highlight fenced code blocks
    pub highlight_code: bool,

    /// Syntax highlighting theme name
    pub syntax_theme: String,

    /// Separate adjacent list items with blank lines before parsing
    pub fix_list_spacing: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            allow_html: true,
            highlight_code: true,
            syntax_theme: DEFAULT_THEME.to_string(),
            fix_list_spacing: true,
        }
    }
}

impl RenderSettings {
    /// Renderer options for these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            html: HtmlOptions {
                allow_html: self.allow_html,
                highlight_code: self.highlight_code,
                syntax_theme: self.syntax_theme.clone(),
            },
            fix_list_spacing: self.fix_list_spacing,
            ..RenderOptions::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Preview pane and hover sync behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Move the editor to the hovered preview element
    pub hover_sync_enabled: bool,

    /// CSS width of the slide column (`--content-width`)
    pub content_width: String,

    /// Editor line height in pixels, used for scroll targets
    pub line_height: f32,

    /// Duration of the editor scroll animation in milliseconds
    pub scroll_animation_ms: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            hover_sync_enabled: true,
            content_width: String::from("min(100%, 960px)"),
            line_height: 20.0,
            scroll_animation_ms: 150,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slide generation
    pub ai: AiSettings,

    /// Deck rendering
    pub render: RenderSettings,

    /// Preview and hover sync
    pub preview: PreviewSettings,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether to open exported files after export
    pub open_after_export: bool,

    /// Last directory used for HTML export
    pub last_export_directory: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently rendered decks (most recent first)
    pub recent_decks: Vec<PathBuf>,

    /// Maximum number of recent decks to remember
    pub max_recent_decks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai: AiSettings::default(),
            render: RenderSettings::default(),
            preview: PreviewSettings::default(),

            open_after_export: false,
            last_export_directory: None,

            recent_decks: Vec::new(),
            max_recent_decks: 10,
        }
    }
}

impl Settings {
    /// Add a deck to the recent list.
    ///
    /// If the deck already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_decks`.
    pub fn add_recent_deck(&mut self, path: PathBuf) {
        self.recent_decks.retain(|p| p != &path);
        self.recent_decks.insert(0, path);
        self.recent_decks.truncate(self.max_recent_decks);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Maximum request timeout.
    pub const MAX_TIMEOUT_SECS: u64 = 600;
    /// Minimum editor line height.
    pub const MIN_LINE_HEIGHT: f32 = 8.0;
    /// Maximum editor line height.
    pub const MAX_LINE_HEIGHT: f32 = 72.0;
    /// Maximum scroll animation duration.
    pub const MAX_SCROLL_ANIMATION_MS: u32 = 2000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        let defaults = AiSettings::default();
        if self.ai.model.trim().is_empty() {
            self.ai.model = defaults.model;
        }
        if self.ai.api_key_env.trim().is_empty() {
            self.ai.api_key_env = defaults.api_key_env;
        }
        let base_url = self.ai.base_url.trim().trim_end_matches('/');
        self.ai.base_url = if base_url.is_empty() {
            defaults.base_url
        } else {
            base_url.to_string()
        };
        self.ai.request_timeout_secs = self.ai.request_timeout_secs.min(Self::MAX_TIMEOUT_SECS);
        if let Some(instructions) = &self.ai.default_instructions {
            if instructions.trim().is_empty() {
                self.ai.default_instructions = None;
            }
        }

        if self.render.syntax_theme.trim().is_empty() {
            self.render.syntax_theme = DEFAULT_THEME.to_string();
        }

        if self.preview.content_width.trim().is_empty() {
            self.preview.content_width = PreviewSettings::default().content_width;
        }
        // NaN from a hand-edited file would survive clamp
        if !self.preview.line_height.is_finite() {
            self.preview.line_height = PreviewSettings::default().line_height;
        }
        self.preview.line_height = self
            .preview
            .line_height
            .clamp(Self::MIN_LINE_HEIGHT, Self::MAX_LINE_HEIGHT);
        self.preview.scroll_animation_ms = self
            .preview
            .scroll_animation_ms
            .min(Self::MAX_SCROLL_ANIMATION_MS);

        if self.max_recent_decks == 0 {
            self.max_recent_decks = 10;
        } else if self.max_recent_decks > 100 {
            self.max_recent_decks = 100;
        }
        self.recent_decks.truncate(self.max_recent_decks);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(settings.ai.request_timeout_secs, 60);
        assert!(settings.render.fix_list_spacing);
        assert!(settings.render.allow_html);
        assert!(settings.preview.hover_sync_enabled);
        assert!(!settings.open_after_export);
        assert!(settings.recent_decks.is_empty());
    }

    #[test]
    fn test_add_recent_deck() {
        let mut settings = Settings::default();
        settings.add_recent_deck(PathBuf::from("/a.md"));
        settings.add_recent_deck(PathBuf::from("/b.md"));
        settings.add_recent_deck(PathBuf::from("/a.md"));

        assert_eq!(
            settings.recent_decks,
            vec![PathBuf::from("/a.md"), PathBuf::from("/b.md")]
        );
    }

    #[test]
    fn test_recent_decks_are_capped() {
        let mut settings = Settings {
            max_recent_decks: 2,
            ..Settings::default()
        };
        for name in ["1", "2", "3"] {
            settings.add_recent_deck(PathBuf::from(name));
        }
        assert_eq!(settings.recent_decks.len(), 2);
        assert_eq!(settings.recent_decks[0], PathBuf::from("3"));
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"ai": {"model": "gemini-1.5-pro"}, "open_after_export": true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.ai.model, "gemini-1.5-pro");
        assert_eq!(settings.ai.api_key_env, "GEMINI_API_KEY");
        assert!(settings.open_after_export);
        assert_eq!(settings.render, RenderSettings::default());
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_ai_settings() {
        let mut settings = Settings::default();
        settings.ai.model = "  ".to_string();
        settings.ai.base_url = "https://example.test/".to_string();
        settings.ai.api_key_env = String::new();
        settings.ai.request_timeout_secs = 100_000;
        settings.ai.default_instructions = Some(" ".to_string());
        settings.sanitize();

        assert_eq!(settings.ai.model, AiSettings::DEFAULT_MODEL);
        assert_eq!(settings.ai.base_url, "https://example.test");
        assert_eq!(settings.ai.api_key_env, AiSettings::DEFAULT_API_KEY_ENV);
        assert_eq!(settings.ai.request_timeout_secs, Settings::MAX_TIMEOUT_SECS);
        assert_eq!(settings.ai.default_instructions, None);
    }

    #[test]
    fn test_sanitize_preview_settings() {
        let mut settings = Settings::default();
        settings.preview.line_height = 1.0;
        settings.preview.scroll_animation_ms = 60_000;
        settings.preview.content_width = String::new();
        settings.sanitize();

        assert_eq!(settings.preview.line_height, Settings::MIN_LINE_HEIGHT);
        assert_eq!(settings.preview.scroll_animation_ms, Settings::MAX_SCROLL_ANIMATION_MS);
        assert_eq!(
            settings.preview.content_width,
            PreviewSettings::default().content_width
        );
    }

    #[test]
    fn test_sanitize_recent_decks() {
        let mut settings = Settings {
            max_recent_decks: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_recent_decks, 10);

        settings.max_recent_decks = 500;
        settings.sanitize();
        assert_eq!(settings.max_recent_decks, 100);
    }

    #[test]
    fn test_render_options_follow_settings() {
        let settings = RenderSettings {
            allow_html: false,
            fix_list_spacing: false,
            ..RenderSettings::default()
        };
        let options = settings.render_options();
        assert!(!options.html.allow_html);
        assert!(!options.fix_list_spacing);
        assert!(options.html.highlight_code);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings =
            Settings::from_json_sanitized(r#"{"preview": {"line_height": 500.0}}"#).unwrap();
        assert_eq!(settings.preview.line_height, Settings::MAX_LINE_HEIGHT);
    }
}
