//! Markdown parser implementation using comrak
//!
//! This module wraps comrak's parsing functions and converts its arena AST
//! into an owned tree where every block carries a 0-based source span.

use comrak::{
    nodes::{
        AstNode, ListDelimType, ListType as ComrakListType, NodeValue,
        TableAlignment as ComrakTableAlignment,
    },
    parse_document, Arena, Options,
};

use super::preprocess::closes_fence;
use super::span::{LineMap, SourceSpan};
use crate::error::Result;
use crate::render::RenderError;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable superscript (^text^)
    pub superscript: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            superscript: false,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.superscript = self.superscript;

        options
    }
}

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered { start: u32, delimiter: char },
}

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl TableAlignment {
    /// CSS `text-align` value, if any.
    pub fn css(&self) -> Option<&'static str> {
        match self {
            TableAlignment::None => None,
            TableAlignment::Left => Some("left"),
            TableAlignment::Center => Some("center"),
            TableAlignment::Right => Some("right"),
        }
    }
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Represents the type of a markdown node.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    /// Root document node
    Document,
    /// Block quote (>)
    BlockQuote,
    /// List container
    List { list_type: ListType, tight: bool },
    /// List item
    Item,
    /// Code block with its info string; `fenced` is false for indented code
    CodeBlock {
        info: String,
        literal: String,
        fenced: bool,
    },
    /// HTML block
    HtmlBlock(String),
    /// Paragraph
    Paragraph,
    /// Heading (H1-H6)
    Heading { level: u8, setext: bool },
    /// Thematic break (horizontal rule), also the slide separator
    ThematicBreak,
    /// Table
    Table { alignments: Vec<TableAlignment> },
    /// Table row
    TableRow { header: bool },
    /// Table cell
    TableCell,
    /// Inline text content
    Text(String),
    /// Task list marker
    TaskItem { checked: bool },
    /// Soft line break
    SoftBreak,
    /// Hard line break
    LineBreak,
    /// Inline code
    Code(String),
    /// Inline HTML
    HtmlInline(String),
    /// Emphasis (italic)
    Emphasis,
    /// Strong emphasis (bold)
    Strong,
    /// Strikethrough
    Strikethrough,
    /// Superscript
    Superscript,
    /// Link
    Link { url: String, title: String },
    /// Image; the alt text lives in the children
    Image { url: String, title: String },
    /// Anything comrak produces that the deck renderer does not handle
    Unsupported,
}

/// A node in the markdown AST with position information.
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    /// The type of this node
    pub node_type: MarkdownNodeType,
    /// Child nodes
    pub children: Vec<MarkdownNode>,
    /// Source lines this node came from, when the parser knows them
    pub span: Option<SourceSpan>,
}

impl MarkdownNode {
    pub fn new(node_type: MarkdownNodeType, span: Option<SourceSpan>) -> Self {
        Self {
            node_type,
            children: Vec::new(),
            span,
        }
    }

    /// Get all text content from this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) => output.push_str(t),
            MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }

    /// Text of the first child that carries any, or an empty string.
    pub fn first_child_text(&self) -> String {
        self.children
            .iter()
            .map(MarkdownNode::text_content)
            .find(|t| !t.trim().is_empty())
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    /// Rewrite every span in this subtree through `map`.
    pub fn remap_spans(&mut self, map: &LineMap) {
        if let Some(span) = self.span {
            self.span = Some(map.map_span(span));
        }
        for child in &mut self.children {
            child.remap_spans(map);
        }
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    /// Root node of the AST
    pub root: MarkdownNode,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into an AST document.
///
/// # Example
/// ```ignore
/// let doc = parse_markdown("# Hello\n\nWorld")?;
/// assert_eq!(doc.root.children.len(), 2);
/// ```
pub fn parse_markdown(markdown: &str) -> Result<MarkdownDocument> {
    parse_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Parse markdown text with custom options.
///
/// Fails when a fenced code block is never closed.
pub fn parse_markdown_with_options(
    markdown: &str,
    options: &MarkdownOptions,
) -> Result<MarkdownDocument> {
    let arena = Arena::new();
    let comrak_options = options.to_comrak_options();

    let root = parse_document(&arena, markdown, &comrak_options);

    let lines: Vec<&str> = markdown.lines().collect();
    let converted_root = convert_node(root, &lines)?;

    Ok(MarkdownDocument {
        root: converted_root,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a comrak AST node to our MarkdownNode structure.
fn convert_node<'a>(node: &'a AstNode<'a>, lines: &[&str]) -> Result<MarkdownNode> {
    let ast = node.data.borrow();
    let sourcepos = ast.sourcepos;

    // comrak lines are 1-indexed and inclusive; 0 means "unknown"
    let span = (sourcepos.start.line > 0).then(|| {
        SourceSpan::new(
            sourcepos.start.line - 1,
            sourcepos.end.line.max(sourcepos.start.line),
        )
    });

    if let NodeValue::CodeBlock(code) = &ast.value {
        if code.fenced && !fence_is_closed(lines, &sourcepos, code.fence_char, code.fence_length) {
            return Err(RenderError::UnclosedCodeFence {
                line: sourcepos.start.line.saturating_sub(1),
            }
            .into());
        }
    }

    let mut markdown_node = MarkdownNode::new(convert_node_value(&ast.value), span);

    for child in node.children() {
        markdown_node.children.push(convert_node(child, lines)?);
    }

    Ok(markdown_node)
}

/// A fenced block is closed when its last line is a closing fence.
fn fence_is_closed(
    lines: &[&str],
    sourcepos: &comrak::nodes::Sourcepos,
    fence_char: u8,
    fence_length: usize,
) -> bool {
    if sourcepos.end.line <= sourcepos.start.line {
        return false;
    }
    let Some(last) = lines.get(sourcepos.end.line - 1) else {
        return false;
    };
    // Drop block quote markers and list indentation in front of the fence
    let last = last.trim_start_matches(|c: char| c == '>' || c == ' ' || c == '\t');
    closes_fence(last, fence_char as char, fence_length)
}

/// Convert a comrak NodeValue to our MarkdownNodeType.
fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet,
                ComrakListType::Ordered => ListType::Ordered {
                    start: list.start as u32,
                    delimiter: if list.delimiter == ListDelimType::Period {
                        '.'
                    } else {
                        ')'
                    },
                },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
            fenced: code.fenced,
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: heading.level.clamp(1, 6),
            setext: heading.setext,
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table
                .alignments
                .iter()
                .map(|a| TableAlignment::from(*a))
                .collect(),
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Superscript => MarkdownNodeType::Superscript,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
            title: image.title.clone(),
        },
        _ => MarkdownNodeType::Unsupported,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    // ─────────────────────────────────────────────────────────────────────────
    // Basic Parsing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_empty_document() {
        let doc = parse_markdown("").unwrap();
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_parse_heading_level() {
        let doc = parse_markdown("## Heading 2").unwrap();
        if let MarkdownNodeType::Heading { level, .. } = &doc.root.children[0].node_type {
            assert_eq!(*level, 2);
        } else {
            panic!("Expected heading node");
        }
    }

    #[test]
    fn test_parse_unordered_list() {
        let doc = parse_markdown("- Item 1\n- Item 2\n- Item 3").unwrap();

        let list = &doc.root.children[0];
        if let MarkdownNodeType::List { list_type, tight } = &list.node_type {
            assert!(matches!(list_type, ListType::Bullet));
            assert!(*tight);
        } else {
            panic!("Expected list node");
        }
        assert_eq!(list.children.len(), 3);
    }

    #[test]
    fn test_loose_list_is_not_tight() {
        let doc = parse_markdown("- Item 1\n\n- Item 2").unwrap();
        assert!(matches!(
            doc.root.children[0].node_type,
            MarkdownNodeType::List { tight: false, .. }
        ));
    }

    #[test]
    fn test_parse_ordered_list_start() {
        let doc = parse_markdown("3. Third\n4. Fourth").unwrap();
        if let MarkdownNodeType::List { list_type, .. } = &doc.root.children[0].node_type {
            assert_eq!(
                *list_type,
                ListType::Ordered {
                    start: 3,
                    delimiter: '.'
                }
            );
        } else {
            panic!("Expected list node");
        }
    }

    #[test]
    fn test_parse_table_with_alignment() {
        let markdown =
            "| Left | Center | Right |\n|:-----|:------:|------:|\n| L    | C      | R     |";
        let doc = parse_markdown(markdown).unwrap();

        let table = doc
            .root
            .children
            .iter()
            .find(|n| matches!(n.node_type, MarkdownNodeType::Table { .. }))
            .expect("table node");

        if let MarkdownNodeType::Table { alignments } = &table.node_type {
            assert_eq!(
                alignments,
                &vec![
                    TableAlignment::Left,
                    TableAlignment::Center,
                    TableAlignment::Right
                ]
            );
        }
    }

    #[test]
    fn test_bold_text_ast_structure() {
        let doc = parse_markdown("This is **bold** text").unwrap();
        let para = &doc.root.children[0];
        let strong = para
            .children
            .iter()
            .find(|c| matches!(c.node_type, MarkdownNodeType::Strong))
            .expect("strong node");
        assert_eq!(strong.text_content(), "bold");
        assert_eq!(para.text_content(), "This is bold text");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Position Information Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_span_is_zero_based_half_open() {
        let doc = parse_markdown("# Heading\n\nParagraph\ncontinued").unwrap();
        assert_eq!(doc.root.children[0].span, Some(SourceSpan::new(0, 1)));
        assert_eq!(doc.root.children[1].span, Some(SourceSpan::new(2, 4)));
    }

    #[test]
    fn test_closed_fence_span_includes_closing_line() {
        let doc = parse_markdown("```rust\nfn main() {}\n```\n").unwrap();
        let code = &doc.root.children[0];
        assert_eq!(code.span, Some(SourceSpan::new(0, 3)));
        if let MarkdownNodeType::CodeBlock { info, literal, fenced } = &code.node_type {
            assert_eq!(info, "rust");
            assert_eq!(literal, "fn main() {}\n");
            assert!(*fenced);
        } else {
            panic!("Expected code block");
        }
    }

    #[test]
    fn test_remap_spans() {
        let mut doc = parse_markdown("# A\n\ntext").unwrap();
        doc.root.remap_spans(&LineMap::identity(3).with_offset(10));
        assert_eq!(doc.root.children[0].span, Some(SourceSpan::new(10, 11)));
        assert_eq!(doc.root.children[1].span, Some(SourceSpan::new(12, 13)));
    }

    #[test]
    fn test_first_child_text_skips_empty_children() {
        let doc = parse_markdown("| ![](x.png) **Name** |\n|---|\n| v |").unwrap();
        let table = &doc.root.children[0];
        let header_cell = &table.children[0].children[0];
        assert!(matches!(header_cell.node_type, MarkdownNodeType::TableCell));
        assert_eq!(header_cell.first_child_text(), "Name");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Error Handling Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_permissive_inputs_still_parse() {
        let inputs = [
            "# Unclosed heading",
            "| broken | table",
            "[unclosed link(",
            "![broken image",
            "***nested emphasis**",
            "    indented code",
        ];

        for input in inputs {
            assert!(parse_markdown(input).is_ok(), "Failed to parse: {}", input);
        }
    }

    #[test]
    fn test_unclosed_fence_is_an_error() {
        let result = parse_markdown("# Title\n\n```\nunclosed code block");
        match result {
            Err(Error::Render(RenderError::UnclosedCodeFence { line })) => assert_eq!(line, 2),
            other => panic!("Expected unclosed fence error, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_opening_fence_is_an_error() {
        assert!(parse_markdown("```").is_err());
    }

    #[test]
    fn test_fence_closed_inside_blockquote() {
        assert!(parse_markdown("> ```\n> code\n> ```").is_ok());
    }

    #[test]
    fn test_longer_closing_fence_is_accepted() {
        assert!(parse_markdown("~~~\ncode\n~~~~~").is_ok());
    }
}
