//! Deck Export Module
//!
//! Turns a rendered deck into something usable outside the editor.
//!
//! # Supported Export Formats
//!
//! - **HTML File**: Complete HTML page with the deck's styles inlined
//! - **Clipboard HTML**: Rendered slides with the markdown as plain text fallback

pub mod clipboard;
pub mod html;

pub use clipboard::{copy_deck_to_clipboard, copy_html_to_clipboard, ClipboardError};
pub use html::{export_to_html_file, generate_html_document, title_from_path};
