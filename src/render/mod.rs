//! Deck rendering
//!
//! Turns a parsed markdown tree into slide HTML plus theme CSS. The HTML
//! writer talks to the outside world only through [`RenderHooks`], which is
//! where [`PositionRecorder`] plugs in to tag blocks with their source span.

pub mod css;
pub mod hooks;
mod html;
pub mod recorder;
pub mod slides;

pub use hooks::{HookContext, PlainHooks, RenderHooks};
pub use html::{render_blocks, HtmlOptions};
pub use recorder::{PositionRecord, PositionRecorder};
pub use slides::{render_deck, RenderOptions, RenderOutput, RenderedDeck, SlideRenderer};

use crate::markdown::LineMap;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that make a document impossible to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A fenced code block opened on `line` (0-based) never closes
    UnclosedCodeFence { line: usize },
}

impl RenderError {
    /// Translate line numbers through `map` into original coordinates.
    pub fn remap(self, map: &LineMap) -> Self {
        match self {
            RenderError::UnclosedCodeFence { line } => RenderError::UnclosedCodeFence {
                line: map.original_line(line),
            },
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnclosedCodeFence { line } => {
                write!(f, "Unclosed code fence starting on line {}", line + 1)
            }
        }
    }
}

impl std::error::Error for RenderError {}
