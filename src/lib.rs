//! NexaPlan
//!
//! Renders Marp-style markdown into slide HTML whose block elements carry
//! `data-position="<start>-<end>"` line spans, so a preview can point back
//! into the editor. Decks can also be drafted by a hosted language model.
//!
//! # Modules
//!
//! - `markdown` - Front matter, list preprocessing and the comrak-based parser
//! - `render` - Position recording and deck rendering
//! - `slides` - The rendering service used by callers
//! - `ai` - Prompt construction and the Gemini client
//! - `preview` - Hover sync from preview elements to editor lines
//! - `session` - Editor state with the stale-generation guard
//! - `export`, `watch`, `config` - Standalone pages, file watching, settings

pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod markdown;
pub mod preview;
pub mod render;
pub mod session;
pub mod slides;
pub mod watch;

pub use error::{Error, Result};
pub use slides::{
    generate_ai_slides, generate_slides, GenerateAiSlidesParams, GenerateSlidesParams,
    GenerateSlidesResult, SlideService,
};
