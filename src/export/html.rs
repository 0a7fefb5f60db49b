//! Standalone deck export
//!
//! Wraps a rendered deck into a complete HTML page that can be opened in a
//! browser without the editor.

use crate::error::{Error, Result};
use crate::slides::GenerateSlidesResult;
use log::info;
use std::path::Path;

/// Title used when none is given.
pub const DEFAULT_TITLE: &str = "Presentation";

/// Page styles around the preview fragment.
const PAGE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 32px 16px;
    background-color: #f1f5f9;
    color: #333333;
}

@media print {
    body {
        padding: 0;
        background: none;
    }

    .marpit section {
        box-shadow: none !important;
        border-radius: 0 !important;
        page-break-after: always;
    }
}
"#;

/// Generate a complete HTML document for a rendered deck.
///
/// The deck's own `<style>` block and `data-position` attributes are kept so
/// the page can be fed back into the hover tooling.
pub fn generate_html_document(result: &GenerateSlidesResult, title: Option<&str>) -> String {
    let doc_title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="NexaPlan">
    <title>{title}</title>
    <style>
{page_css}
    </style>
</head>
<body>
{body}</body>
</html>
"#,
        title = html_escape::encode_text(doc_title),
        page_css = PAGE_CSS,
        body = result.html,
    )
}

/// Write the standalone page for `result` to `output_path`.
pub fn export_to_html_file(
    result: &GenerateSlidesResult,
    output_path: &Path,
    title: Option<&str>,
) -> Result<()> {
    let html = generate_html_document(result, title);

    std::fs::write(output_path, html).map_err(|source| Error::FileWrite {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!(
        "Exported {} slide(s) to {}",
        result.slide_count,
        output_path.display()
    );
    Ok(())
}

/// Title for a deck stored at `path`: the file stem.
pub fn title_from_path(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
