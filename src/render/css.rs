//! Theme CSS for rendered decks.

use crate::markdown::Directives;
use log::warn;

/// Slide width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    pub width: u32,
    pub height: u32,
}

impl SlideSize {
    pub const WIDE: SlideSize = SlideSize {
        width: 1280,
        height: 720,
    };
    pub const STANDARD: SlideSize = SlideSize {
        width: 960,
        height: 720,
    };

    /// Resolve the `size` directive; unknown values fall back to 16:9.
    pub fn from_directive(size: Option<&str>) -> Self {
        match size.map(str::trim) {
            None | Some("16:9") => Self::WIDE,
            Some("4:3") => Self::STANDARD,
            Some(other) => {
                warn!("Unknown slide size '{}', using 16:9", other);
                Self::WIDE
            }
        }
    }
}

/// Built-in deck themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Gaia,
    Uncover,
}

impl Theme {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            None | Some("default") => Theme::Default,
            Some("gaia") => Theme::Gaia,
            Some("uncover") => Theme::Uncover,
            Some(other) => {
                warn!("Unknown theme '{}', using default", other);
                Theme::Default
            }
        }
    }

    fn css(&self) -> &'static str {
        match self {
            Theme::Default => DEFAULT_THEME_CSS,
            Theme::Gaia => GAIA_THEME_CSS,
            Theme::Uncover => UNCOVER_THEME_CSS,
        }
    }
}

/// Build the deck stylesheet: theme, size, pagination, then the `style`
/// directive verbatim.
pub fn deck_css(directives: &Directives) -> String {
    let size = SlideSize::from_directive(directives.size.as_deref());
    let theme = Theme::from_name(directives.theme.as_deref());

    let mut css = String::with_capacity(2048);
    css.push_str(&format!(
        "section {{\n  width: {}px;\n  height: {}px;\n  position: relative;\n  box-sizing: border-box;\n  overflow: hidden;\n}}\n",
        size.width, size.height
    ));
    css.push_str(theme.css());
    css.push_str(PAGINATION_CSS);
    css.push_str(HEADER_FOOTER_CSS);

    if let Some(style) = directives.style.as_deref() {
        css.push('\n');
        css.push_str(style);
    }
    css
}

// ─────────────────────────────────────────────────────────────────────────────
// Stylesheets
// ─────────────────────────────────────────────────────────────────────────────

const DEFAULT_THEME_CSS: &str = r#"
section {
  padding: 70px;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  font-size: 29px;
  line-height: 1.5;
  background: #fff;
  color: #24292e;
}
section h1 { font-size: 1.8em; color: #246; }
section h2 { font-size: 1.5em; color: #246; }
section code { background: #f6f8fa; border-radius: 3px; padding: 0.1em 0.3em; }
section pre { background: #f6f8fa; padding: 0.8em; overflow: auto; }
section table { border-collapse: collapse; }
section th, section td { border: 1px solid #dfe2e5; padding: 0.2em 0.6em; }
"#;

const GAIA_THEME_CSS: &str = r#"
section {
  padding: 70px;
  font-family: Lato, 'Avenir Next', Avenir, 'Trebuchet MS', 'Segoe UI', sans-serif;
  font-size: 35px;
  line-height: 1.35;
  background: #fff8e1;
  color: #455a64;
}
section h1, section h2 { color: #0288d1; }
section.lead { display: flex; flex-direction: column; justify-content: center; text-align: center; }
section code { background: #fff3cd; padding: 0.1em 0.3em; }
"#;

const UNCOVER_THEME_CSS: &str = r#"
section {
  padding: 78px;
  font-family: 'Helvetica Neue', Arial, sans-serif;
  font-size: 40px;
  line-height: 1.35;
  background: #fdfcff;
  color: #202228;
  display: flex;
  flex-direction: column;
  justify-content: center;
  text-align: center;
}
section h1, section h2 { letter-spacing: -0.02em; }
section ul, section ol { text-align: left; }
"#;

const PAGINATION_CSS: &str = r#"
section[data-pagination]::after {
  content: attr(data-pagination);
  position: absolute;
  right: 30px;
  bottom: 21px;
  font-size: 24px;
  color: #777;
}
"#;

const HEADER_FOOTER_CSS: &str = r#"
section > header, section > footer {
  position: absolute;
  left: 30px;
  right: 30px;
  font-size: 18px;
  color: #777;
}
section > header { top: 21px; }
section > footer { bottom: 21px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_directive() {
        assert_eq!(SlideSize::from_directive(None), SlideSize::WIDE);
        assert_eq!(SlideSize::from_directive(Some("4:3")), SlideSize::STANDARD);
        assert_eq!(SlideSize::from_directive(Some("21:9")), SlideSize::WIDE);
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_name(Some("Gaia")), Theme::Gaia);
        assert_eq!(Theme::from_name(Some("uncover")), Theme::Uncover);
        assert_eq!(Theme::from_name(Some("nope")), Theme::Default);
        assert_eq!(Theme::from_name(None), Theme::Default);
    }

    #[test]
    fn test_deck_css_sizes_sections() {
        let directives = Directives {
            size: Some("4:3".to_string()),
            ..Directives::default()
        };
        assert!(deck_css(&directives).contains("width: 960px;"));
        assert!(deck_css(&Directives::default()).contains("width: 1280px;"));
    }

    #[test]
    fn test_style_directive_comes_last() {
        let directives = Directives {
            style: Some("h1 { color: red; }".to_string()),
            ..Directives::default()
        };
        assert!(deck_css(&directives).ends_with("h1 { color: red; }"));
    }
}
