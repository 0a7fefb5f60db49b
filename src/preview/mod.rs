//! Preview sync module for NexaPlan
//!
//! This module keeps the source editor following the pointer in the rendered
//! preview, using the `data-position` spans the renderer emits.

mod hover_sync;

pub use hover_sync::{EditorJump, HoverSync, HoverSyncConfig};
