//! Per-block render hooks
//!
//! The HTML writer never emits an opening tag for a hookable block itself; it
//! asks a [`RenderHooks`] implementation to do it. Default method bodies emit
//! the plain tag, so an implementation only overrides what it needs.

use crate::markdown::{SourceSpan, TableAlignment};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Extra attributes to put on an opening tag, in order.
pub type Attributes = Vec<(&'static str, String)>;

/// What the writer knows about the block being opened.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Original source lines of the block, if known
    pub span: Option<SourceSpan>,
    /// First textual content of the block
    pub text: &'a str,
}

/// One hook per block kind that can carry extra attributes.
pub trait RenderHooks {
    fn paragraph_open(&mut self, cx: &HookContext<'_>, out: &mut String) {
        let _ = cx;
        write_open_tag(out, "p", &[]);
    }

    /// `level` is 1–6.
    fn heading_open(&mut self, level: u8, cx: &HookContext<'_>, out: &mut String) {
        let _ = cx;
        write_open_tag(out, heading_tag(level), &[]);
    }

    fn list_item_open(&mut self, cx: &HookContext<'_>, out: &mut String) {
        let _ = cx;
        write_open_tag(out, "li", &[]);
    }

    fn table_header_cell_open(
        &mut self,
        align: TableAlignment,
        cx: &HookContext<'_>,
        out: &mut String,
    ) {
        let _ = cx;
        write_cell_open(out, "th", align, Vec::new());
    }

    fn table_data_cell_open(
        &mut self,
        align: TableAlignment,
        cx: &HookContext<'_>,
        out: &mut String,
    ) {
        let _ = cx;
        write_cell_open(out, "td", align, Vec::new());
    }

    /// Emits the whole `<pre><code>` block; `body` is already HTML.
    fn code_fence(&mut self, lang: &str, body: &str, cx: &HookContext<'_>, out: &mut String) {
        let _ = cx;
        write_code_fence(out, lang, body, Vec::new());
    }

    /// `alt` is plain text; `cx.text` carries the same value.
    fn image(&mut self, src: &str, alt: &str, title: &str, cx: &HookContext<'_>, out: &mut String) {
        let _ = cx;
        write_image(out, src, alt, title, Vec::new());
    }
}

/// Hooks that emit plain tags with no extra attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHooks;

impl RenderHooks for PlainHooks {}

// ─────────────────────────────────────────────────────────────────────────────
// Tag Writers
// ─────────────────────────────────────────────────────────────────────────────

pub fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

/// Write `<tag a="v" ...>` with escaped attribute values.
pub fn write_open_tag(out: &mut String, tag: &str, attrs: &[(&'static str, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
}

/// Table cell with its alignment turned into an inline style.
pub fn write_cell_open(out: &mut String, tag: &str, align: TableAlignment, mut attrs: Attributes) {
    if let Some(css) = align.css() {
        attrs.push(("style", format!("text-align:{}", css)));
    }
    write_open_tag(out, tag, &attrs);
}

pub fn write_code_fence(out: &mut String, lang: &str, body: &str, attrs: Attributes) {
    write_open_tag(out, "pre", &attrs);
    if lang.is_empty() {
        out.push_str("<code>");
    } else {
        write_open_tag(out, "code", &[("class", format!("language-{}", lang))]);
    }
    out.push_str(body);
    out.push_str("</code></pre>\n");
}

pub fn write_image(out: &mut String, src: &str, alt: &str, title: &str, mut attrs: Attributes) {
    let mut all: Attributes = vec![("src", src.to_string()), ("alt", alt.to_string())];
    if !title.is_empty() {
        all.push(("title", title.to_string()));
    }
    all.append(&mut attrs);

    // write_open_tag would close with `>`; images are void elements
    write_open_tag(out, "img", &all);
    out.pop();
    out.push_str(" />");
}

/// Escape text content.
pub fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    encode_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx() -> HookContext<'static> {
        HookContext {
            span: Some(SourceSpan::new(0, 1)),
            text: "t",
        }
    }

    #[test]
    fn test_plain_hooks_emit_bare_tags() {
        let mut hooks = PlainHooks;
        let mut out = String::new();
        hooks.paragraph_open(&cx(), &mut out);
        hooks.heading_open(3, &cx(), &mut out);
        hooks.list_item_open(&cx(), &mut out);
        assert_eq!(out, "<p><h3><li>");
    }

    #[test]
    fn test_cell_alignment_style() {
        let mut out = String::new();
        PlainHooks.table_header_cell_open(TableAlignment::Center, &cx(), &mut out);
        PlainHooks.table_data_cell_open(TableAlignment::None, &cx(), &mut out);
        assert_eq!(out, "<th style=\"text-align:center\"><td>");
    }

    #[test]
    fn test_code_fence_language_class() {
        let mut out = String::new();
        PlainHooks.code_fence("rust", "x", &cx(), &mut out);
        assert_eq!(out, "<pre><code class=\"language-rust\">x</code></pre>\n");

        out.clear();
        PlainHooks.code_fence("", "x", &cx(), &mut out);
        assert_eq!(out, "<pre><code>x</code></pre>\n");
    }

    #[test]
    fn test_image_attributes_are_escaped() {
        let mut out = String::new();
        PlainHooks.image("a.png", "say \"hi\"", "", &cx(), &mut out);
        assert_eq!(out, "<img src=\"a.png\" alt=\"say &quot;hi&quot;\" />");
    }

    #[test]
    fn test_heading_tag_clamps() {
        assert_eq!(heading_tag(1), "h1");
        assert_eq!(heading_tag(6), "h6");
        assert_eq!(heading_tag(9), "h6");
    }
}
