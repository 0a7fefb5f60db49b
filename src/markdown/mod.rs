//! Markdown input handling
//!
//! This module turns raw deck markdown into a parsed tree whose spans point
//! at lines of the text the user actually wrote.
//!
//! # Features
//! - Marp front matter (global directives) via serde_yaml
//! - List spacing fix-up with an output→input line map
//! - CommonMark + GFM parsing using comrak
//! - Syntax highlighting for code fences using syntect
//!
//! # Example
//! ```ignore
//! use nexaplan::markdown::{front_matter, preprocess, parse_markdown};
//!
//! let fm = front_matter::split(markdown);
//! let fixed = preprocess::preprocess_with_map(fm.body);
//! let mut doc = parse_markdown(&fixed.text)?;
//! doc.root.remap_spans(&fixed.line_map.with_offset(fm.body_line_offset));
//! ```

pub mod front_matter;
mod parser;
pub mod preprocess;
pub mod span;
pub mod syntax;

pub use front_matter::Directives;
pub use parser::{
    parse_markdown, parse_markdown_with_options, ListType, MarkdownDocument, MarkdownNode,
    MarkdownNodeType, MarkdownOptions, TableAlignment,
};
pub use preprocess::preprocess;
pub use span::{LineMap, SourceSpan};
