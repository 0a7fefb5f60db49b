//! List spacing fix-up applied before parsing.
//!
//! Adjacent list-marker lines are pulled apart with blank lines so that every
//! item becomes its own loose-list paragraph, and a list that directly follows
//! a paragraph or heading gets a blank line in front of it.
//!
//! The pass is line-oriented: indentation levels are not interpreted, so
//! nested lists are treated exactly like flat ones. Lines inside fenced code
//! blocks are copied through untouched.

use super::span::LineMap;
use regex::Regex;
use std::sync::OnceLock;

/// `*`, `-`, `+` or `<digits>.` followed by whitespace, after optional indentation.
const LIST_MARKER_PATTERN: &str = r"^[ \t]*(?:[*+-]|[0-9]+\.)[ \t]";

/// Opening or closing code fence: up to three spaces, then 3+ backticks or tildes.
const FENCE_PATTERN: &str = r"^ {0,3}(`{3,}|~{3,})";

fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LIST_MARKER_PATTERN).expect("list marker pattern is valid"))
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern is valid"))
}

/// Output of [`preprocess_with_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    /// The rewritten markdown
    pub text: String,
    /// Output line → input line
    pub line_map: LineMap,
    /// Number of blank lines that were inserted
    pub inserted: usize,
}

/// Check whether a line starts with a list marker.
pub fn is_list_marker_line(line: &str) -> bool {
    list_marker_regex().is_match(line)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Insert blank lines around list markers.
///
/// `"* a\n* b\n* c"` becomes `"* a\n\n* b\n\n* c"`.
pub fn preprocess(markdown: &str) -> String {
    preprocess_with_map(markdown).text
}

/// Same as [`preprocess`], also returning where each output line came from.
pub fn preprocess_with_map(markdown: &str) -> Preprocessed {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() * 2);
    let mut map: Vec<usize> = Vec::with_capacity(lines.len() * 2);
    let mut inserted = 0;

    // (fence char, fence length) of the currently open code fence
    let mut open_fence: Option<(char, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some((fence_char, fence_len)) = open_fence {
            if closes_fence(line, fence_char, fence_len) {
                open_fence = None;
            }
            out.push(line);
            map.push(i);
            continue;
        }

        if let Some(caps) = fence_regex().captures(line) {
            let fence = &caps[1];
            let fence_char = fence.chars().next().unwrap_or('`');
            open_fence = Some((fence_char, fence.len()));
        } else if is_list_marker_line(line) && i > 0 && !is_blank(lines[i - 1]) {
            out.push("");
            map.push(i - 1);
            inserted += 1;
        }

        out.push(line);
        map.push(i);
    }

    Preprocessed {
        text: out.join("\n"),
        line_map: LineMap::from_lines(map),
        inserted,
    }
}

/// A closing fence uses the same character, is at least as long as the
/// opening one, and carries nothing else but whitespace.
pub(crate) fn closes_fence(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let run = trimmed.chars().take_while(|c| *c == fence_char).count();
    run >= fence_len && trimmed[run * fence_char.len_utf8()..].trim().is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
