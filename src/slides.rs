//! Slide Rendering Service
//!
//! Entry points used by the CLI and the editor session: render a deck to a
//! self-contained preview fragment, or ask a model for a deck first.

use crate::ai::{wrap_generated, SlidePrompt, TextGenerator};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::render::{render_deck, PositionRecord, RenderOptions};
use log::{debug, info};
use serde::Serialize;

/// Starter deck for a new presentation.
pub const DEFAULT_DECK: &str = r##"---
marp: true
theme: default
paginate: true
backgroundColor: "#ffffff"
size: "16:9"
color: "#333333"
style: |
  section {
    font-family: 'Arial', 'Helvetica', sans-serif;
    padding: 80px 50px 20px;
    font-size: 16px;
  }
  h1 {
    color: #2c3e50;
    font-size: 2.5em;
    border-bottom: 2px solid #2c3e50;
    padding-bottom: 10px;
  }
  h2 {
    color: #34495e;
    font-size: 2.0em;
    position: absolute;
    top: 20px;
    left: 50px;
    right: 50px;
    padding-bottom: 5px;
    border-bottom: 1px solid #34495e;
  }
  h3 {
    color: #7f8c8d;
    font-size: 1.8em;
  }
  table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 20px;
  }
  th, td {
    border: 1px solid #bdc3c7;
    padding: 10px;
    text-align: left;
  }
  th {
    background-color: #ecf0f1;
    color: #2c3e50;
  }
  .highlight {
    background-color: #f1f8e9;
    padding: 5px;
    border-radius: 3px;
  }
  .columns {
    display: grid;
    grid-template-columns: repeat(2, 1fr);
    gap: 20px;
  }
  hr {
    display: none;
  }
---

# "##;

/// Presentation styles applied around every rendered deck.
const PREVIEW_CSS: &str = r#"
.marpit {
  width: var(--content-width);
  margin: 0 auto;
}
.marpit section {
  width: 100% !important;
  aspect-ratio: 16/9 !important;
  margin-bottom: 24px !important;
  background: white !important;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif !important;
  padding: 48px !important;
  box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1) !important;
  border-radius: 8px !important;
}
.marpit h1 {
  font-size: 2.5em !important;
  line-height: 1.4 !important;
  margin-bottom: 0.8em !important;
  color: #2B3A55 !important;
}
.marpit h2 {
  font-size: 2em !important;
  line-height: 1.4 !important;
  margin-bottom: 0.6em !important;
  color: #2B3A55 !important;
}
.marpit p, .marpit li {
  font-size: 1.2em !important;
  line-height: 1.6 !important;
  margin-bottom: 0.5em !important;
}
.marpit ul, .marpit ol {
  padding-left: 1.5em !important;
  margin-bottom: 1em !important;
}
.marpit img {
  max-height: 60%;
  object-fit: contain;
}
.marpit * {
  box-sizing: border-box !important;
  max-width: 100% !important;
  word-wrap: break-word !important;
  overflow-wrap: break-word !important;
}
"#;

const DEFAULT_CONTENT_WIDTH: &str = "min(100%, 960px)";

// ─────────────────────────────────────────────────────────────────────────────
// Parameters and Results
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct GenerateSlidesParams<'a> {
    pub markdown: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateAiSlidesParams<'a> {
    pub topic: &'a str,
    pub additional_instructions: Option<&'a str>,
}

/// A rendered deck ready for the preview pane.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateSlidesResult {
    /// The markdown that was rendered, exactly as given
    pub markdown: String,
    /// Preview fragment: `<style>` followed by `<div class="marpit">`
    pub html: String,
    /// One record per `data-position` attribute in `html`, in document order
    pub positions: Vec<PositionRecord>,
    /// Number of `<section>` slides
    pub slide_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

/// Renders and generates decks with a fixed set of options.
#[derive(Debug, Clone)]
pub struct SlideService {
    render: RenderOptions,
    content_width: String,
}

impl Default for SlideService {
    fn default() -> Self {
        Self::new(RenderOptions::default(), DEFAULT_CONTENT_WIDTH)
    }
}

impl SlideService {
    pub fn new(render: RenderOptions, content_width: impl Into<String>) -> Self {
        Self {
            render,
            content_width: content_width.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.render.render_options(),
            settings.preview.content_width.clone(),
        )
    }

    /// Preprocess, render and wrap `params.markdown`.
    pub fn generate_slides(&self, params: &GenerateSlidesParams<'_>) -> Result<GenerateSlidesResult> {
        let deck = render_deck(params.markdown, &self.render)?;
        let html = self.wrap_preview(&deck.output.html, &deck.output.css);

        Ok(GenerateSlidesResult {
            markdown: params.markdown.to_string(),
            html,
            positions: deck.positions,
            slide_count: deck.slide_count,
        })
    }

    /// Ask `generator` for a deck on `params.topic` and render it.
    pub fn generate_ai_slides<G>(
        &self,
        generator: &G,
        params: &GenerateAiSlidesParams<'_>,
    ) -> Result<GenerateSlidesResult>
    where
        G: TextGenerator + ?Sized,
    {
        let markdown = self.generate_markdown(generator, params)?;
        self.generate_slides(&GenerateSlidesParams {
            markdown: &markdown,
        })
    }

    /// The generation half of [`generate_ai_slides`](Self::generate_ai_slides).
    pub fn generate_markdown<G>(
        &self,
        generator: &G,
        params: &GenerateAiSlidesParams<'_>,
    ) -> Result<String>
    where
        G: TextGenerator + ?Sized,
    {
        let topic = params.topic.trim();
        if topic.is_empty() {
            return Err(Error::EmptyTopic);
        }

        let prompt = SlidePrompt::new(topic, params.additional_instructions).render();
        info!("Generating slides for topic: {}", topic);

        let text = generator.generate(&prompt)?;
        if text.trim().is_empty() {
            return Err(Error::EmptyGeneration);
        }
        debug!("Generated markdown:\n{}", text);

        Ok(wrap_generated(&text))
    }

    fn wrap_preview(&self, html: &str, css: &str) -> String {
        format!(
            "<style>\n.marpit {{ --content-width: {}; }}\n{}\n{}\n</style>\n<div class=\"marpit\">\n{}</div>\n",
            self.content_width, PREVIEW_CSS, css, html
        )
    }
}

/// Render with default options.
pub fn generate_slides(params: &GenerateSlidesParams<'_>) -> Result<GenerateSlidesResult> {
    SlideService::default().generate_slides(params)
}

/// Generate and render with default options.
pub fn generate_ai_slides<G>(
    generator: &G,
    params: &GenerateAiSlidesParams<'_>,
) -> Result<GenerateSlidesResult>
where
    G: TextGenerator + ?Sized,
{
    SlideService::default().generate_ai_slides(generator, params)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
