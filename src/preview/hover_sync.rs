//! Hover-to-scroll sync between the rendered preview and the source editor.
//!
//! When the pointer rests on a preview element, its `data-position` value
//! names the source lines it came from. [`HoverSync`] turns that value into
//! an [`EditorJump`]: where to put the cursor, what to select, and where to
//! scroll so the line sits a third of the way down the editor viewport.
//!
//! # Usage
//!
//! ```ignore
//! let mut sync = HoverSync::new(HoverSyncConfig::default());
//! sync.update_positions(result.positions);
//!
//! if let Some(jump) = sync.on_hover("3-5", viewport_height) {
//!     editor.set_cursor(jump.cursor_line);
//! }
//! while let Some(offset) = sync.animated_offset() {
//!     editor.scroll_to(offset);
//! }
//! ```

use crate::config::PreviewSettings;
use crate::markdown::SourceSpan;
use crate::render::PositionRecord;
use log::debug;
use serde::Serialize;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for hover sync.
#[derive(Debug, Clone)]
pub struct HoverSyncConfig {
    /// Editor line height in pixels
    pub line_height: f32,
    /// Whether to animate editor scrolling
    pub smooth_scrolling: bool,
    /// Animation duration for smooth scrolling
    pub animation_duration: Duration,
}

impl Default for HoverSyncConfig {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            smooth_scrolling: true,
            animation_duration: Duration::from_millis(150),
        }
    }
}

impl From<&PreviewSettings> for HoverSyncConfig {
    fn from(settings: &PreviewSettings) -> Self {
        Self {
            line_height: settings.line_height,
            smooth_scrolling: settings.scroll_animation_ms > 0,
            animation_duration: Duration::from_millis(u64::from(settings.scroll_animation_ms)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Jump
// ─────────────────────────────────────────────────────────────────────────────

/// What the editor should do for one hover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorJump {
    /// 0-based line the cursor moves to (start of line)
    pub cursor_line: usize,
    /// Lines to select
    pub selection: SourceSpan,
    /// Editor scroll offset in pixels, never negative
    pub scroll_target: f32,
    /// Text recorded for the span, if the span came from the last render
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    started: Instant,
}

// ─────────────────────────────────────────────────────────────────────────────
// Hover Sync State
// ─────────────────────────────────────────────────────────────────────────────

/// Hover sync controller for one editor/preview pair.
#[derive(Debug)]
pub struct HoverSync {
    /// Whether hover sync is enabled
    pub enabled: bool,
    config: HoverSyncConfig,
    /// Records of the last render
    positions: Vec<PositionRecord>,
    /// Last span acted on, so resting on one element does not re-trigger
    last_hovered: Option<SourceSpan>,
    /// Last known editor scroll offset
    editor_offset: f32,
    animation: Option<ScrollAnimation>,
}

impl Default for HoverSync {
    fn default() -> Self {
        Self::new(HoverSyncConfig::default())
    }
}

impl HoverSync {
    pub fn new(config: HoverSyncConfig) -> Self {
        Self {
            enabled: true,
            config,
            positions: Vec::new(),
            last_hovered: None,
            editor_offset: 0.0,
            animation: None,
        }
    }

    pub fn from_settings(settings: &PreviewSettings) -> Self {
        Self {
            enabled: settings.hover_sync_enabled,
            ..Self::new(HoverSyncConfig::from(settings))
        }
    }

    /// Set whether hover sync is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear_animation();
            self.last_hovered = None;
        }
    }

    /// Toggle hover sync on/off, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Replace the records after a render.
    pub fn update_positions(&mut self, positions: Vec<PositionRecord>) {
        self.positions = positions;
        self.last_hovered = None;
    }

    pub fn positions(&self) -> &[PositionRecord] {
        &self.positions
    }

    /// Update the last known editor scroll offset.
    pub fn update_editor_offset(&mut self, offset: f32) {
        self.editor_offset = offset;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hover Handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a hover over an element carrying `data-position="<attribute>"`.
    ///
    /// Returns `None` when sync is off, the value is malformed, or the same
    /// element is still hovered.
    pub fn on_hover(&mut self, attribute: &str, viewport_height: f32) -> Option<EditorJump> {
        if !self.enabled {
            return None;
        }

        let span = match attribute.parse::<SourceSpan>() {
            Ok(span) => span,
            Err(e) => {
                debug!("Ignoring hover: {}", e);
                return None;
            }
        };

        if self.last_hovered == Some(span) {
            return None;
        }
        self.last_hovered = Some(span);

        let jump = self.jump_for_span(span, viewport_height);
        self.animate_to(jump.scroll_target);
        Some(jump)
    }

    /// Call when the pointer leaves the preview.
    pub fn on_leave(&mut self) {
        self.last_hovered = None;
    }

    /// Compute the jump for a span without touching any state.
    pub fn jump_for_span(&self, span: SourceSpan, viewport_height: f32) -> EditorJump {
        let text = self
            .positions
            .iter()
            .find(|record| record.span == span)
            .map(|record| record.text.clone());

        EditorJump {
            cursor_line: span.start,
            selection: span,
            scroll_target: self.scroll_target_for_line(span.start, viewport_height),
            text,
        }
    }

    /// Offset that puts `line` one third down the viewport.
    pub fn scroll_target_for_line(&self, line: usize, viewport_height: f32) -> f32 {
        let line_top = line as f32 * self.config.line_height;
        (line_top - viewport_height / 3.0).max(0.0)
    }

    /// The innermost record whose span contains `line`.
    ///
    /// Nested blocks (a paragraph inside a list item) share lines; the
    /// narrowest span wins, and among equals the later, deeper one.
    pub fn record_at_line(&self, line: usize) -> Option<&PositionRecord> {
        self.positions
            .iter()
            .filter(|record| record.span.contains_line(line))
            .fold(None, |best: Option<&PositionRecord>, record| match best {
                Some(b) if b.span.len() < record.span.len() => Some(b),
                _ => Some(record),
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation Support
    // ─────────────────────────────────────────────────────────────────────────

    fn animate_to(&mut self, target: f32) {
        self.animation = Some(ScrollAnimation {
            from: self.editor_offset,
            to: target,
            started: Instant::now(),
        });
    }

    /// Current animated editor offset, or `None` when no animation runs.
    pub fn animated_offset(&mut self) -> Option<f32> {
        self.animated_offset_at(Instant::now())
    }

    /// Same as [`animated_offset`](Self::animated_offset) at a given instant.
    pub fn animated_offset_at(&mut self, now: Instant) -> Option<f32> {
        let animation = self.animation?;

        let duration = self.config.animation_duration.as_secs_f32();
        let progress = if !self.config.smooth_scrolling || duration <= 0.0 {
            1.0
        } else {
            (now.saturating_duration_since(animation.started).as_secs_f32() / duration).min(1.0)
        };

        if progress >= 1.0 {
            self.animation = None;
            self.editor_offset = animation.to;
            return Some(animation.to);
        }

        // Ease-out quad for smooth deceleration
        let eased = 1.0 - (1.0 - progress).powi(2);
        let current = animation.from + (animation.to - animation.from) * eased;
        self.editor_offset = current;
        Some(current)
    }

    /// Check if an animation is currently running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Clear any pending animation.
    pub fn clear_animation(&mut self) {
        self.animation = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: usize, end: usize, text: &str) -> PositionRecord {
        PositionRecord {
            span: SourceSpan::new(start, end),
            text: text.to_string(),
        }
    }

    fn sync() -> HoverSync {
        let mut sync = HoverSync::new(HoverSyncConfig {
            line_height: 20.0,
            smooth_scrolling: false,
            animation_duration: Duration::ZERO,
        });
        sync.update_positions(vec![
            record(0, 1, "Title"),
            record(2, 4, "item"),
            record(2, 3, "item"),
            record(3, 5, "para"),
        ]);
        sync
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Jumps
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_hover_moves_cursor_to_span_start() {
        let mut sync = sync();
        let jump = sync.on_hover("3-5", 300.0).unwrap();

        assert_eq!(jump.cursor_line, 3);
        assert_eq!(jump.selection, SourceSpan::new(3, 5));
        assert_eq!(jump.scroll_target, (3.0_f32 * 20.0 - 300.0 / 3.0).max(0.0));
        assert_eq!(jump.text.as_deref(), Some("para"));
    }

    #[test]
    fn test_scroll_target_places_line_a_third_down() {
        let sync = sync();
        assert_eq!(sync.scroll_target_for_line(30, 300.0), 600.0 - 100.0);
        assert_eq!(sync.scroll_target_for_line(0, 300.0), 0.0);
    }

    #[test]
    fn test_unknown_span_still_jumps_without_text() {
        let mut sync = sync();
        let jump = sync.on_hover("10-12", 90.0).unwrap();
        assert_eq!(jump.cursor_line, 10);
        assert_eq!(jump.scroll_target, 170.0);
        assert_eq!(jump.text, None);
    }

    #[test]
    fn test_malformed_attribute_is_ignored() {
        let mut sync = sync();
        assert!(sync.on_hover("", 100.0).is_none());
        assert!(sync.on_hover("7", 100.0).is_none());
        assert!(sync.on_hover("x-y", 100.0).is_none());
    }

    #[test]
    fn test_same_element_does_not_retrigger() {
        let mut sync = sync();
        assert!(sync.on_hover("0-1", 100.0).is_some());
        assert!(sync.on_hover("0-1", 100.0).is_none());
        assert!(sync.on_hover("2-4", 100.0).is_some());

        sync.on_leave();
        assert!(sync.on_hover("2-4", 100.0).is_some());
    }

    #[test]
    fn test_new_positions_reset_hover_state() {
        let mut sync = sync();
        assert!(sync.on_hover("0-1", 100.0).is_some());
        sync.update_positions(vec![record(0, 1, "New")]);
        let jump = sync.on_hover("0-1", 100.0).unwrap();
        assert_eq!(jump.text.as_deref(), Some("New"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toggle
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toggle_disables_hover() {
        let mut sync = sync();
        assert!(!sync.toggle());
        assert!(sync.on_hover("0-1", 100.0).is_none());
        assert!(sync.toggle());
        assert!(sync.on_hover("0-1", 100.0).is_some());
    }

    #[test]
    fn test_from_settings() {
        let settings = PreviewSettings {
            hover_sync_enabled: false,
            line_height: 18.0,
            scroll_animation_ms: 0,
            ..PreviewSettings::default()
        };
        let sync = HoverSync::from_settings(&settings);
        assert!(!sync.enabled);
        assert_eq!(sync.scroll_target_for_line(10, 0.0), 180.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reverse lookup
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_record_at_line_prefers_innermost() {
        let sync = sync();
        assert_eq!(sync.record_at_line(0).unwrap().text, "Title");
        assert_eq!(sync.record_at_line(2).unwrap().span, SourceSpan::new(2, 3));
        // Equal widths: the later record wins
        assert_eq!(sync.record_at_line(3).unwrap().span, SourceSpan::new(3, 5));
        assert_eq!(sync.record_at_line(4).unwrap().span, SourceSpan::new(3, 5));
        assert!(sync.record_at_line(1).is_none());
        assert!(sync.record_at_line(99).is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Animation
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_without_smooth_scrolling_jumps_immediately() {
        let mut sync = sync();
        sync.on_hover("30-31", 300.0);
        assert!(sync.is_animating());
        assert_eq!(sync.animated_offset(), Some(500.0));
        assert!(!sync.is_animating());
        assert_eq!(sync.animated_offset(), None);
    }

    #[test]
    fn test_smooth_scroll_eases_out() {
        let mut sync = HoverSync::new(HoverSyncConfig {
            line_height: 10.0,
            smooth_scrolling: true,
            animation_duration: Duration::from_millis(100),
        });
        sync.update_editor_offset(0.0);
        sync.on_hover("100-101", 0.0);
        let started = sync.animation.unwrap().started;

        let halfway = sync.animated_offset_at(started + Duration::from_millis(50)).unwrap();
        // Ease-out: more than half the distance after half the time
        assert!(halfway > 500.0 && halfway < 1000.0, "{}", halfway);

        let done = sync.animated_offset_at(started + Duration::from_millis(100)).unwrap();
        assert_eq!(done, 1000.0);
        assert!(!sync.is_animating());
    }
}
