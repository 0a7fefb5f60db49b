//! Source position recording for editor/preview sync.
//!
//! [`PositionRecorder`] is a [`RenderHooks`] implementation that tags each
//! hookable block with `data-position="<start>-<end>"` and keeps a matching
//! [`PositionRecord`]. A recorder lives for exactly one render call.

use super::hooks::{
    heading_tag, write_cell_open, write_code_fence, write_image, write_open_tag, Attributes,
    HookContext, RenderHooks,
};
use crate::markdown::{SourceSpan, TableAlignment};
use serde::{Deserialize, Serialize};

/// Attribute carrying the source span of a rendered block.
pub const POSITION_ATTRIBUTE: &str = "data-position";

/// One rendered block traced back to its source lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub span: SourceSpan,
    /// First textual content of the block, possibly empty
    pub text: String,
}

/// Collects one [`PositionRecord`] per tagged block, in document order.
#[derive(Debug, Default)]
pub struct PositionRecorder {
    positions: Vec<PositionRecord>,
}

impl PositionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far.
    pub fn positions(&self) -> &[PositionRecord] {
        &self.positions
    }

    /// Finish recording.
    pub fn into_positions(self) -> Vec<PositionRecord> {
        self.positions
    }

    /// Record the block and return the attribute to add, if it has a span.
    fn record(&mut self, cx: &HookContext<'_>) -> Attributes {
        match cx.span {
            Some(span) => {
                self.positions.push(PositionRecord {
                    span,
                    text: cx.text.to_string(),
                });
                vec![(POSITION_ATTRIBUTE, span.to_attribute())]
            }
            None => Vec::new(),
        }
    }
}

impl RenderHooks for PositionRecorder {
    fn paragraph_open(&mut self, cx: &HookContext<'_>, out: &mut String) {
        let attrs = self.record(cx);
        write_open_tag(out, "p", &attrs);
    }

    fn heading_open(&mut self, level: u8, cx: &HookContext<'_>, out: &mut String) {
        let attrs = self.record(cx);
        write_open_tag(out, heading_tag(level), &attrs);
    }

    fn list_item_open(&mut self, cx: &HookContext<'_>, out: &mut String) {
        let attrs = self.record(cx);
        write_open_tag(out, "li", &attrs);
    }

    fn table_header_cell_open(
        &mut self,
        align: TableAlignment,
        cx: &HookContext<'_>,
        out: &mut String,
    ) {
        let attrs = self.record(cx);
        write_cell_open(out, "th", align, attrs);
    }

    fn table_data_cell_open(
        &mut self,
        align: TableAlignment,
        cx: &HookContext<'_>,
        out: &mut String,
    ) {
        let attrs = self.record(cx);
        write_cell_open(out, "td", align, attrs);
    }

    fn code_fence(&mut self, lang: &str, body: &str, cx: &HookContext<'_>, out: &mut String) {
        let attrs = self.record(cx);
        write_code_fence(out, lang, body, attrs);
    }

    fn image(&mut self, src: &str, alt: &str, title: &str, cx: &HookContext<'_>, out: &mut String) {
        let attrs = self.record(cx);
        write_image(out, src, alt, title, attrs);
    }
}

/// Count `data-position` attributes in rendered HTML, looking only inside
/// tags so that paragraph text can't be mistaken for one.
#[cfg(test)]
pub(crate) fn count_position_attributes(html: &str) -> usize {
    html.split('<')
        .skip(1)
        .map(|rest| rest.split('>').next().unwrap_or(""))
        .map(|tag| tag.matches(" data-position=\"").count())
        .sum()
}
