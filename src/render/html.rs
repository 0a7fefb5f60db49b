//! HTML writer over the parsed markdown tree.
//!
//! Block openings for paragraphs, headings, list items, table cells, code
//! fences and images go through [`RenderHooks`]; everything else is written
//! directly.

use super::hooks::{escape, write_open_tag, HookContext, RenderHooks};
use crate::markdown::syntax::{get_highlighter, DEFAULT_THEME};
use crate::markdown::{ListType, MarkdownNode, MarkdownNodeType, TableAlignment};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// `data-position` written by the author inside raw HTML.
const RAW_POSITION_PATTERN: &str = r#"(?i)\s+data-position\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#;

fn raw_position_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RAW_POSITION_PATTERN).expect("raw position pattern is valid"))
}

/// Remove `data-position` attributes from passed-through HTML. Only the
/// recorder may emit them; every one in the output must have a record.
fn strip_raw_positions(html: &str) -> Cow<'_, str> {
    raw_position_regex().replace_all(html, "")
}

/// Options for the HTML writer.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pass raw HTML blocks and inline HTML through unescaped
    pub allow_html: bool,
    /// Highlight fenced code with syntect
    pub highlight_code: bool,
    /// syntect theme used for highlighting
    pub syntax_theme: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            allow_html: true,
            highlight_code: true,
            syntax_theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// Render a sequence of block nodes to HTML.
pub fn render_blocks<H>(nodes: &[MarkdownNode], hooks: &mut H, options: &HtmlOptions) -> String
where
    H: RenderHooks + ?Sized,
{
    let mut writer = HtmlWriter {
        hooks,
        options,
        out: String::new(),
    };
    for node in nodes {
        writer.block(node, false);
    }
    writer.out
}

struct HtmlWriter<'a, H: RenderHooks + ?Sized> {
    hooks: &'a mut H,
    options: &'a HtmlOptions,
    out: String,
}

impl<H: RenderHooks + ?Sized> HtmlWriter<'_, H> {
    /// `tight` is set for the direct children of a tight list item.
    fn block(&mut self, node: &MarkdownNode, tight: bool) {
        match &node.node_type {
            MarkdownNodeType::Document => {
                for child in &node.children {
                    self.block(child, false);
                }
            }
            MarkdownNodeType::Paragraph if tight => {
                self.inlines(&node.children);
            }
            MarkdownNodeType::Paragraph => {
                let text = node.text_content();
                let cx = HookContext {
                    span: node.span,
                    text: text.trim(),
                };
                self.hooks.paragraph_open(&cx, &mut self.out);
                self.inlines(&node.children);
                self.out.push_str("</p>\n");
            }
            MarkdownNodeType::Heading { level, .. } => {
                let text = node.text_content();
                let cx = HookContext {
                    span: node.span,
                    text: text.trim(),
                };
                self.hooks.heading_open(*level, &cx, &mut self.out);
                self.inlines(&node.children);
                self.out
                    .push_str(&format!("</{}>\n", super::hooks::heading_tag(*level)));
            }
            MarkdownNodeType::BlockQuote => {
                self.out.push_str("<blockquote>\n");
                for child in &node.children {
                    self.block(child, false);
                }
                self.out.push_str("</blockquote>\n");
            }
            MarkdownNodeType::List { list_type, tight } => self.list(node, *list_type, *tight),
            MarkdownNodeType::Item | MarkdownNodeType::TaskItem { .. } => {
                // Items outside a list do not occur in comrak output
                self.list_item(node, false);
            }
            MarkdownNodeType::CodeBlock {
                info,
                literal,
                fenced,
            } => {
                if *fenced {
                    self.code_fence(node, info, literal);
                } else {
                    self.out.push_str("<pre><code>");
                    self.out.push_str(&escape(literal));
                    self.out.push_str("</code></pre>\n");
                }
            }
            MarkdownNodeType::HtmlBlock(html) => {
                if self.options.allow_html {
                    self.out.push_str(&strip_raw_positions(html));
                } else {
                    self.out.push_str("<p>");
                    self.out.push_str(&escape(html.trim_end()));
                    self.out.push_str("</p>\n");
                }
            }
            MarkdownNodeType::ThematicBreak => self.out.push_str("<hr />\n"),
            MarkdownNodeType::Table { alignments } => self.table(node, alignments),
            // Inline content at block level (e.g. loose text in a tight item)
            _ => self.inline(node),
        }
    }

    fn list(&mut self, node: &MarkdownNode, list_type: ListType, tight: bool) {
        let tag = match list_type {
            ListType::Bullet => {
                self.out.push_str("<ul>\n");
                "ul"
            }
            ListType::Ordered { start, .. } => {
                if start == 1 {
                    self.out.push_str("<ol>\n");
                } else {
                    write_open_tag(&mut self.out, "ol", &[("start", start.to_string())]);
                    self.out.push('\n');
                }
                "ol"
            }
        };
        for item in &node.children {
            self.list_item(item, tight);
        }
        self.out.push_str(&format!("</{}>\n", tag));
    }

    fn list_item(&mut self, node: &MarkdownNode, tight: bool) {
        let text = node.first_child_text();
        let cx = HookContext {
            span: node.span,
            text: &text,
        };
        self.hooks.list_item_open(&cx, &mut self.out);

        if let MarkdownNodeType::TaskItem { checked } = node.node_type {
            self.out.push_str(if checked {
                "<input type=\"checkbox\" checked=\"\" disabled=\"\" /> "
            } else {
                "<input type=\"checkbox\" disabled=\"\" /> "
            });
        }

        for (i, child) in node.children.iter().enumerate() {
            let is_paragraph = matches!(child.node_type, MarkdownNodeType::Paragraph);
            if !(tight && is_paragraph) && (i == 0 || tight) && !self.out.ends_with('\n') {
                self.out.push('\n');
            }
            self.block(child, tight);
        }
        self.out.push_str("</li>\n");
    }

    fn code_fence(&mut self, node: &MarkdownNode, info: &str, literal: &str) {
        let lang = info.split_whitespace().next().unwrap_or("");
        let highlighted = if self.options.highlight_code && !lang.is_empty() {
            get_highlighter().highlight_html(literal, lang, &self.options.syntax_theme)
        } else {
            None
        };
        let body = highlighted.unwrap_or_else(|| escape(literal).into_owned());

        let first_line = literal.lines().next().unwrap_or("");
        let cx = HookContext {
            span: node.span,
            text: first_line,
        };
        self.hooks.code_fence(lang, &body, &cx, &mut self.out);
    }

    fn table(&mut self, node: &MarkdownNode, alignments: &[TableAlignment]) {
        self.out.push_str("<table>\n");
        let mut body_open = false;

        for row in &node.children {
            let header = matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
            if header {
                self.out.push_str("<thead>\n");
            } else if !body_open {
                self.out.push_str("<tbody>\n");
                body_open = true;
            }

            self.out.push_str("<tr>\n");
            for (i, cell) in row.children.iter().enumerate() {
                let align = alignments.get(i).copied().unwrap_or_default();
                let text = cell.first_child_text();
                let cx = HookContext {
                    span: cell.span,
                    text: &text,
                };
                if header {
                    self.hooks.table_header_cell_open(align, &cx, &mut self.out);
                    self.inlines(&cell.children);
                    self.out.push_str("</th>\n");
                } else {
                    self.hooks.table_data_cell_open(align, &cx, &mut self.out);
                    self.inlines(&cell.children);
                    self.out.push_str("</td>\n");
                }
            }
            self.out.push_str("</tr>\n");

            if header {
                self.out.push_str("</thead>\n");
            }
        }

        if body_open {
            self.out.push_str("</tbody>\n");
        }
        self.out.push_str("</table>\n");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline content
    // ─────────────────────────────────────────────────────────────────────────

    fn inlines(&mut self, nodes: &[MarkdownNode]) {
        for node in nodes {
            self.inline(node);
        }
    }

    fn wrapped(&mut self, tag: &str, node: &MarkdownNode) {
        self.out.push_str(&format!("<{}>", tag));
        self.inlines(&node.children);
        self.out.push_str(&format!("</{}>", tag));
    }

    fn inline(&mut self, node: &MarkdownNode) {
        match &node.node_type {
            MarkdownNodeType::Text(text) => self.out.push_str(&escape(text)),
            MarkdownNodeType::SoftBreak => self.out.push('\n'),
            MarkdownNodeType::LineBreak => self.out.push_str("<br />\n"),
            MarkdownNodeType::Code(code) => {
                self.out.push_str("<code>");
                self.out.push_str(&escape(code));
                self.out.push_str("</code>");
            }
            MarkdownNodeType::HtmlInline(html) => {
                if self.options.allow_html {
                    self.out.push_str(&strip_raw_positions(html));
                } else {
                    self.out.push_str(&escape(html));
                }
            }
            MarkdownNodeType::Emphasis => self.wrapped("em", node),
            MarkdownNodeType::Strong => self.wrapped("strong", node),
            MarkdownNodeType::Strikethrough => self.wrapped("del", node),
            MarkdownNodeType::Superscript => self.wrapped("sup", node),
            MarkdownNodeType::Link { url, title } => {
                let mut attrs = vec![("href", url.clone())];
                if !title.is_empty() {
                    attrs.push(("title", title.clone()));
                }
                write_open_tag(&mut self.out, "a", &attrs);
                self.inlines(&node.children);
                self.out.push_str("</a>");
            }
            MarkdownNodeType::Image { url, title } => {
                let alt = node.text_content();
                let cx = HookContext {
                    span: node.span,
                    text: &alt,
                };
                self.hooks.image(url, &alt, title, &cx, &mut self.out);
            }
            _ => self.inlines(&node.children),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_markdown;
    use crate::render::hooks::PlainHooks;
    use crate::render::recorder::{count_position_attributes, PositionRecorder};

    fn plain(markdown: &str) -> String {
        let doc = parse_markdown(markdown).unwrap();
        let options = HtmlOptions {
            highlight_code: false,
            ..HtmlOptions::default()
        };
        render_blocks(&doc.root.children, &mut PlainHooks, &options)
    }

    fn recorded(markdown: &str) -> (String, PositionRecorder) {
        let doc = parse_markdown(markdown).unwrap();
        let mut recorder = PositionRecorder::new();
        let html = render_blocks(&doc.root.children, &mut recorder, &HtmlOptions::default());
        (html, recorder)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Plain output
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            plain("# Title\n\nSome *text*"),
            "<h1>Title</h1>\n<p>Some <em>text</em></p>\n"
        );
    }

    #[test]
    fn test_tight_list_has_no_paragraphs() {
        assert_eq!(plain("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_list_wraps_paragraphs() {
        assert_eq!(
            plain("- a\n\n- b"),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        assert!(plain("3. c\n4. d").starts_with("<ol start=\"3\">\n"));
        assert!(plain("1. a").starts_with("<ol>\n"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(plain("a < b & c"), "<p>a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn test_html_passthrough_is_optional() {
        let doc = parse_markdown("<div>raw</div>").unwrap();
        let allowed = render_blocks(&doc.root.children, &mut PlainHooks, &HtmlOptions::default());
        assert!(allowed.contains("<div>raw</div>"));

        let options = HtmlOptions {
            allow_html: false,
            ..HtmlOptions::default()
        };
        let escaped = render_blocks(&doc.root.children, &mut PlainHooks, &options);
        assert!(escaped.contains("&lt;div&gt;"));
    }

    #[test]
    fn test_raw_html_cannot_forge_positions() {
        let (html, recorder) =
            recorded("<div data-position=\"9-9\">raw</div>\n\n# A <span DATA-POSITION='4-5' class=\"x\">b</span>");
        assert!(html.contains("<div>raw</div>"));
        assert!(html.contains("<span class=\"x\">b</span>"));
        assert_eq!(recorder.positions().len(), 1);
        assert_eq!(count_position_attributes(&html), 1);
    }

    #[test]
    fn test_table_structure() {
        let html = plain("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert!(html.contains("<thead>\n<tr>\n<th style=\"text-align:left\">A</th>"));
        assert!(html.contains("<tbody>\n<tr>\n<td style=\"text-align:left\">1</td>"));
        assert!(html.contains("<td style=\"text-align:right\">2</td>"));
    }

    #[test]
    fn test_unhighlighted_code_is_escaped() {
        assert_eq!(
            plain("```html\n<b>\n```"),
            "<pre><code class=\"language-html\">&lt;b&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_task_items_get_checkboxes() {
        let html = plain("- [x] done\n- [ ] todo");
        assert!(html.contains("checked=\"\""));
        assert_eq!(html.matches("type=\"checkbox\"").count(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recorded output
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_position() {
        let (html, recorder) = recorded("# Title");
        assert!(html.contains("<h1 data-position=\"0-1\">Title</h1>"));
        let positions = recorder.into_positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].text, "Title");
    }

    #[test]
    fn test_every_hooked_block_is_recorded_once() {
        let markdown = "# H\n\npara\n\n- a\n- b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n\n```rust\nlet x = 1;\n```\n\n![alt text](i.png)";
        let (html, recorder) = recorded(markdown);
        let positions = recorder.into_positions();

        assert_eq!(positions.len(), count_position_attributes(&html));

        let texts: Vec<&str> = positions.iter().map(|p| p.text.as_str()).collect();
        assert!(texts.contains(&"H"));
        assert!(texts.contains(&"para"));
        assert!(texts.contains(&"a"));
        assert!(texts.contains(&"x"));
        assert!(texts.contains(&"2"));
        assert!(texts.contains(&"let x = 1;"));
        assert!(texts.contains(&"alt text"));
    }

    #[test]
    fn test_positions_in_document_order() {
        let (_, recorder) = recorded("# A\n\nb\n\n## C\n\nd");
        let starts: Vec<usize> = recorder.positions().iter().map(|p| p.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_code_fence_span_covers_fences() {
        let (html, recorder) = recorded("```\nfirst\nsecond\n```");
        assert!(html.starts_with("<pre data-position=\"0-4\"><code>"));
        assert_eq!(recorder.positions()[0].text, "first");
    }
}
