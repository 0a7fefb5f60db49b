//! Source line spans and the line map used to translate them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A half-open, 0-based `[start, end)` line range in the original markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    /// Create a span, widening an empty or inverted range to one line.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start + 1),
        }
    }

    /// Number of lines covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans always cover at least one line.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a 0-based line falls inside the span.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// Value for the `data-position` attribute.
    pub fn to_attribute(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Error returned when a `data-position` value is not `"<start>-<end>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpanError(pub String);

impl fmt::Display for ParseSpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid position '{}', expected <start>-<end>", self.0)
    }
}

impl std::error::Error for ParseSpanError {}

impl FromStr for SourceSpan {
    type Err = ParseSpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSpanError(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(err)?;
        let start: usize = start.parse().map_err(|_| err())?;
        let end: usize = end.parse().map_err(|_| err())?;
        if start >= end {
            return Err(err());
        }
        Ok(Self { start, end })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Map
// ─────────────────────────────────────────────────────────────────────────────

/// Maps lines of transformed text back to lines of the original text.
///
/// Entry `i` holds the original line that transformed line `i` came from.
/// Entries are non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap {
    lines: Vec<usize>,
    offset: usize,
}

impl LineMap {
    /// Identity map over `count` lines.
    pub fn identity(count: usize) -> Self {
        Self {
            lines: (0..count).collect(),
            offset: 0,
        }
    }

    pub(crate) fn from_lines(lines: Vec<usize>) -> Self {
        Self { lines, offset: 0 }
    }

    /// Shift every mapped line by `offset` (e.g. lines removed in front).
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Number of transformed lines known to the map.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Original line for a transformed line.
    pub fn original_line(&self, line: usize) -> usize {
        let mapped = match self.lines.get(line) {
            Some(l) => *l,
            // Past the end: keep the distance from the last known line
            None => match self.lines.last() {
                Some(last) => last + (line + 1 - self.lines.len()),
                None => line,
            },
        };
        mapped + self.offset
    }

    /// Translate a span of transformed text into original coordinates.
    pub fn map_span(&self, span: SourceSpan) -> SourceSpan {
        let start = self.original_line(span.start);
        let end = self.original_line(span.end.saturating_sub(1).max(span.start)) + 1;
        SourceSpan::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_format() {
        assert_eq!(SourceSpan::new(0, 1).to_attribute(), "0-1");
        assert_eq!(SourceSpan::new(3, 7).to_string(), "3-7");
    }

    #[test]
    fn test_new_widens_empty_span() {
        assert_eq!(SourceSpan::new(4, 4), SourceSpan { start: 4, end: 5 });
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!("2-5".parse::<SourceSpan>(), Ok(SourceSpan::new(2, 5)));
        assert_eq!(" 0-1 ".parse::<SourceSpan>(), Ok(SourceSpan::new(0, 1)));
        assert!("5".parse::<SourceSpan>().is_err());
        assert!("5-5".parse::<SourceSpan>().is_err());
        assert!("a-b".parse::<SourceSpan>().is_err());
        assert!("".parse::<SourceSpan>().is_err());
    }

    #[test]
    fn test_contains_line() {
        let span = SourceSpan::new(2, 4);
        assert!(!span.contains_line(1));
        assert!(span.contains_line(2));
        assert!(span.contains_line(3));
        assert!(!span.contains_line(4));
    }

    #[test]
    fn test_line_map_with_inserted_lines() {
        // original: 0 "* a", 1 "* b"  →  transformed: "* a", "", "* b"
        let map = LineMap::from_lines(vec![0, 0, 1]);
        assert_eq!(map.map_span(SourceSpan::new(0, 1)), SourceSpan::new(0, 1));
        assert_eq!(map.map_span(SourceSpan::new(2, 3)), SourceSpan::new(1, 2));
        // A span ending on the inserted blank line stays on the first item
        assert_eq!(map.map_span(SourceSpan::new(0, 2)), SourceSpan::new(0, 1));
    }

    #[test]
    fn test_line_map_offset() {
        let map = LineMap::identity(3).with_offset(4);
        assert_eq!(map.map_span(SourceSpan::new(0, 2)), SourceSpan::new(4, 6));
        // Lines beyond the table extrapolate
        assert_eq!(map.original_line(5), 9);
    }
}
