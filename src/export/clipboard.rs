//! Clipboard Operations for Deck Export
//!
//! Copies a rendered deck to the system clipboard using the arboard crate.
//! Where the platform supports an HTML flavour, apps like email clients and
//! word processors paste the formatted slides; the markdown is offered as the
//! plain text fallback.

use crate::error::Error;
use crate::slides::GenerateSlidesResult;
use arboard::Clipboard;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    Access(String),
    /// Failed to set clipboard content
    Write(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Access(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::Write(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<ClipboardError> for Error {
    fn from(err: ClipboardError) -> Self {
        Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy an HTML fragment to the clipboard with a plain text fallback.
pub fn copy_html_to_clipboard(html: &str, plain_text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;

    clipboard
        .set_html(html, Some(plain_text))
        .map_err(|e| ClipboardError::Write(e.to_string()))?;

    debug!("Copied {} bytes of HTML to clipboard", html.len());
    Ok(())
}

/// Copy a rendered deck: its preview HTML, with the markdown as fallback.
pub fn copy_deck_to_clipboard(result: &GenerateSlidesResult) -> Result<(), ClipboardError> {
    copy_html_to_clipboard(&result.html, &result.markdown)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::Access("no display".to_string());
        assert_eq!(err.to_string(), "Clipboard access error: no display");

        let err = ClipboardError::Write("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_converts_to_crate_error() {
        let err: Error = ClipboardError::Write("busy".to_string()).into();
        match err {
            Error::Clipboard(msg) => assert_eq!(msg, "Clipboard write error: busy"),
            other => panic!("Expected clipboard error, got {:?}", other),
        }
    }

    // Actual clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
