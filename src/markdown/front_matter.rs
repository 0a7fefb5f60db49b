//! Marp front matter: the leading `---` YAML block holding global directives.

use log::warn;
use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Global deck directives.
///
/// Unknown keys are ignored so decks written for other Marp tooling still
/// render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Directives {
    pub marp: bool,
    pub theme: Option<String>,
    /// `16:9` (default) or `4:3`
    pub size: Option<String>,
    pub paginate: bool,
    /// Extra CSS appended after the theme
    pub style: Option<String>,
    pub background_color: Option<String>,
    pub color: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub class: Option<String>,
}

/// A document split into its front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    /// Raw YAML between the delimiters, if the document has front matter
    pub yaml: Option<&'a str>,
    /// Everything after the closing delimiter
    pub body: &'a str,
    /// Number of lines removed in front of `body`
    pub body_line_offset: usize,
}

impl FrontMatter<'_> {
    /// Parse the directives, falling back to defaults on invalid YAML.
    pub fn directives(&self) -> Directives {
        match self.yaml {
            Some(yaml) if !yaml.trim().is_empty() => {
                serde_yaml::from_str(yaml).unwrap_or_else(|e| {
                    warn!("Ignoring invalid front matter: {}", e);
                    Directives::default()
                })
            }
            _ => Directives::default(),
        }
    }
}

/// Split a document into front matter and body.
///
/// Front matter must open on the very first line with `---` and close with
/// another `---` line. Without a closing line the whole text is body.
pub fn split(markdown: &str) -> FrontMatter<'_> {
    let no_front_matter = FrontMatter {
        yaml: None,
        body: markdown,
        body_line_offset: 0,
    };

    let mut lines = markdown.split_inclusive('\n');
    let yaml_start = match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => first.len(),
        _ => return no_front_matter,
    };

    let mut consumed = yaml_start;
    let mut line_count = 1;

    for line in lines {
        line_count += 1;
        if line.trim_end() == DELIMITER {
            return FrontMatter {
                yaml: Some(&markdown[yaml_start..consumed]),
                body: &markdown[consumed + line.len()..],
                body_line_offset: line_count,
            };
        }
        consumed += line.len();
    }

    no_front_matter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_front_matter() {
        let fm = split("# Title\n\nText");
        assert_eq!(fm.yaml, None);
        assert_eq!(fm.body, "# Title\n\nText");
        assert_eq!(fm.body_line_offset, 0);
        assert_eq!(fm.directives(), Directives::default());
    }

    #[test]
    fn test_front_matter_is_split() {
        let fm = split("---\nmarp: true\npaginate: true\n---\n\n# Title");
        assert_eq!(fm.yaml, Some("marp: true\npaginate: true\n"));
        assert_eq!(fm.body, "\n# Title");
        assert_eq!(fm.body_line_offset, 4);

        let directives = fm.directives();
        assert!(directives.marp);
        assert!(directives.paginate);
    }

    #[test]
    fn test_unclosed_front_matter_is_body() {
        let fm = split("---\n# Not front matter");
        assert_eq!(fm.yaml, None);
        assert_eq!(fm.body_line_offset, 0);
    }

    #[test]
    fn test_thematic_break_later_is_not_front_matter() {
        let fm = split("# Slide 1\n---\n# Slide 2");
        assert_eq!(fm.yaml, None);
    }

    #[test]
    fn test_style_block_and_camel_case_keys() {
        let md = "---\nmarp: true\nbackgroundColor: \"#ffffff\"\nsize: \"4:3\"\nstyle: |\n  h1 { color: red; }\n---\n# T";
        let directives = split(md).directives();
        assert_eq!(directives.background_color.as_deref(), Some("#ffffff"));
        assert_eq!(directives.size.as_deref(), Some("4:3"));
        assert_eq!(directives.style.as_deref(), Some("h1 { color: red; }\n"));
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_defaults() {
        let directives = split("---\npaginate: [unclosed\n---\n# T").directives();
        assert_eq!(directives, Directives::default());
    }

    #[test]
    fn test_empty_front_matter() {
        let fm = split("---\n---\n# T");
        assert_eq!(fm.yaml, Some(""));
        assert_eq!(fm.body, "# T");
        assert_eq!(fm.body_line_offset, 2);
        assert_eq!(fm.directives(), Directives::default());
    }
}
