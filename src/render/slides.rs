//! Slide deck renderer
//!
//! Splits a Marp-style document into `<section>` slides at top-level `---`
//! breaks and renders each through the HTML writer with a fresh
//! [`PositionRecorder`]. Spans in the output always refer to lines of the
//! markdown passed in, not to the preprocessed text the parser saw.

use super::css::deck_css;
use super::hooks::{escape, write_open_tag, Attributes};
use super::html::{render_blocks, HtmlOptions};
use super::recorder::{PositionRecord, PositionRecorder};
use crate::error::{Error, Result};
use crate::markdown::{
    front_matter, parse_markdown_with_options, preprocess::preprocess_with_map, Directives,
    LineMap, MarkdownNode, MarkdownNodeType, MarkdownOptions,
};
use log::debug;

/// Options for rendering a deck.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub html: HtmlOptions,
    pub markdown: MarkdownOptions,
    /// Run the list spacing fix-up before parsing
    pub fix_list_spacing: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            html: HtmlOptions::default(),
            markdown: MarkdownOptions::default(),
            fix_list_spacing: true,
        }
    }
}

/// HTML and CSS for one render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    pub css: String,
}

/// A render result together with its position records.
#[derive(Debug, Clone, Default)]
pub struct RenderedDeck {
    pub output: RenderOutput,
    pub positions: Vec<PositionRecord>,
    pub directives: Directives,
    pub slide_count: usize,
}

/// Render a deck. Each call starts from an empty recorder.
pub fn render_deck(markdown: &str, options: &RenderOptions) -> Result<RenderedDeck> {
    let fm = front_matter::split(markdown);
    let directives = fm.directives();

    let (text, line_map) = if options.fix_list_spacing {
        let fixed = preprocess_with_map(fm.body);
        debug!("List fix-up inserted {} blank line(s)", fixed.inserted);
        (fixed.text, fixed.line_map)
    } else {
        let count = fm.body.split('\n').count();
        (fm.body.to_string(), LineMap::identity(count))
    };
    let line_map = line_map.with_offset(fm.body_line_offset);

    let mut doc = parse_markdown_with_options(&text, &options.markdown).map_err(|e| match e {
        Error::Render(err) => Error::Render(err.remap(&line_map)),
        other => other,
    })?;
    doc.root.remap_spans(&line_map);

    let slides = split_slides(&doc.root.children);
    let total = slides.len();
    let mut recorder = PositionRecorder::new();
    let mut html = String::new();

    for (index, blocks) in slides.iter().enumerate() {
        let number = index + 1;
        write_open_tag(&mut html, "section", &section_attributes(number, total, &directives));
        html.push('\n');
        if let Some(header) = &directives.header {
            html.push_str(&format!("<header>{}</header>\n", escape(header)));
        }
        html.push_str(&render_blocks(blocks, &mut recorder, &options.html));
        if let Some(footer) = &directives.footer {
            html.push_str(&format!("<footer>{}</footer>\n", escape(footer)));
        }
        html.push_str("</section>\n");
    }

    let positions = recorder.into_positions();
    debug!(
        "Rendered {} slide(s) with {} position record(s)",
        total,
        positions.len()
    );

    Ok(RenderedDeck {
        output: RenderOutput {
            html,
            css: deck_css(&directives),
        },
        positions,
        directives,
        slide_count: total,
    })
}

/// Group top-level blocks into slides; there is always at least one slide.
fn split_slides(blocks: &[MarkdownNode]) -> Vec<&[MarkdownNode]> {
    blocks
        .split(|node| matches!(node.node_type, MarkdownNodeType::ThematicBreak))
        .collect()
}

fn section_attributes(number: usize, total: usize, directives: &Directives) -> Attributes {
    let mut attrs: Attributes = vec![("id", number.to_string())];

    if let Some(class) = &directives.class {
        attrs.push(("class", class.clone()));
    }

    let mut style = String::new();
    if let Some(bg) = &directives.background_color {
        style.push_str(&format!("background-color:{};", bg));
    }
    if let Some(color) = &directives.color {
        style.push_str(&format!("color:{};", color));
    }
    if !style.is_empty() {
        attrs.push(("style", style));
    }

    if directives.paginate {
        attrs.push(("data-pagination", number.to_string()));
        attrs.push(("data-pagination-total", total.to_string()));
    }
    attrs
}

// ─────────────────────────────────────────────────────────────────────────────
// Slide Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Renders decks and keeps the positions of the most recent render.
///
/// Positions from an earlier call never survive a later one; a failed render
/// leaves no positions behind.
#[derive(Debug, Default)]
pub struct SlideRenderer {
    options: RenderOptions,
    positions: Vec<PositionRecord>,
}

impl SlideRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            positions: Vec::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&mut self, markdown: &str) -> Result<RenderOutput> {
        self.positions.clear();
        let deck = render_deck(markdown, &self.options)?;
        self.positions = deck.positions;
        Ok(deck.output)
    }

    /// Positions recorded by the last successful [`render`](Self::render).
    pub fn positions(&self) -> &[PositionRecord] {
        &self.positions
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
