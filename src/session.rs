//! Editor session state
//!
//! Holds what the editor page shows: the markdown being edited, the last good
//! preview, its positions, the last error and generation progress. Every
//! edit re-renders. AI generations are tracked with a sequence number so a
//! result that arrives after a newer edit or a newer generation is dropped
//! instead of overwriting the user's work.

use crate::ai::TextGenerator;
use crate::error::{Error, Result};
use crate::render::PositionRecord;
use crate::slides::{
    GenerateAiSlidesParams, GenerateSlidesParams, GenerateSlidesResult, SlideService,
};
use log::{debug, info, warn};

/// Progress of an AI generation, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStep {
    #[default]
    Idle,
    /// Request sent, waiting for the model
    Analyzing,
    /// Model answered, deck is being rendered
    Composing,
    /// Result applied
    Finalizing,
}

impl GenerationStep {
    pub fn label(&self) -> &'static str {
        match self {
            GenerationStep::Idle => "Idle",
            GenerationStep::Analyzing => "Analyzing your idea",
            GenerationStep::Composing => "Composing slides",
            GenerationStep::Finalizing => "Finalizing",
        }
    }
}

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// What happened to a finished generation.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The result replaced the session content
    Applied,
    /// A newer edit or generation superseded it
    Stale,
    /// The generation failed; the error is also kept in the session
    Failed,
}

/// One editor/preview session.
#[derive(Debug, Default)]
pub struct Session {
    service: SlideService,
    markdown: String,
    rendered: GenerateSlidesResult,
    last_error: Option<String>,
    step: GenerationStep,
    sequence: u64,
    pending: Option<u64>,
}

impl Session {
    pub fn new(service: SlideService) -> Self {
        Self {
            service,
            ..Self::default()
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// The last successful render; its markdown can lag behind
    /// [`markdown`](Self::markdown) after a failed edit.
    pub fn rendered(&self) -> &GenerateSlidesResult {
        &self.rendered
    }

    /// Preview HTML of the last successful render.
    pub fn html(&self) -> &str {
        &self.rendered.html
    }

    pub fn positions(&self) -> &[PositionRecord] {
        &self.rendered.positions
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn step(&self) -> GenerationStep {
        self.step
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn service(&self) -> &SlideService {
        &self.service
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the markdown and re-render.
    ///
    /// The content is kept even when rendering fails; the preview then keeps
    /// showing the last good render and the error is recorded. Any pending
    /// generation becomes stale.
    pub fn edit(&mut self, content: impl Into<String>) -> Result<()> {
        self.sequence += 1;
        if self.pending.take().is_some() {
            debug!("Edit supersedes pending generation");
            self.step = GenerationStep::Idle;
        }
        self.markdown = content.into();
        self.rerender()
    }

    fn rerender(&mut self) -> Result<()> {
        match self.service.generate_slides(&GenerateSlidesParams {
            markdown: &self.markdown,
        }) {
            Ok(result) => {
                self.rendered = result;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Error generating slides: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a generation; any earlier pending one becomes stale.
    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.sequence += 1;
        self.pending = Some(self.sequence);
        self.step = GenerationStep::Analyzing;
        self.last_error = None;
        GenerationTicket(self.sequence)
    }

    /// Mark that the model answered and rendering is under way.
    pub fn mark_composing(&mut self, ticket: GenerationTicket) {
        if self.is_current(ticket) {
            self.step = GenerationStep::Composing;
        }
    }

    fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.pending == Some(ticket.0)
    }

    /// Resolve a generation started with [`begin_generation`](Self::begin_generation).
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GenerateSlidesResult>,
    ) -> GenerationOutcome {
        if !self.is_current(ticket) {
            info!("Discarding stale generation result");
            return GenerationOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(result) => {
                self.markdown = result.markdown.clone();
                self.rendered = result;
                self.last_error = None;
                self.step = GenerationStep::Idle;
                GenerationOutcome::Applied
            }
            Err(e) => {
                self.record_failure(&e);
                GenerationOutcome::Failed
            }
        }
    }

    fn record_failure(&mut self, err: &Error) {
        warn!("Error generating slides: {}", err);
        self.last_error = Some(err.to_string());
        self.step = GenerationStep::Idle;
    }

    /// Mark that the deck is rendered and about to be applied.
    pub fn mark_finalizing(&mut self, ticket: GenerationTicket) {
        if self.is_current(ticket) {
            self.step = GenerationStep::Finalizing;
        }
    }

    /// Run a whole AI generation synchronously, stepping through
    /// `Analyzing`, `Composing` and `Finalizing`.
    pub fn generate_ai<G>(
        &mut self,
        generator: &G,
        params: &GenerateAiSlidesParams<'_>,
    ) -> Result<GenerationOutcome>
    where
        G: TextGenerator + ?Sized,
    {
        let ticket = self.begin_generation();
        let result = self
            .service
            .generate_markdown(generator, params)
            .and_then(|markdown| {
                self.mark_composing(ticket);
                self.service.generate_slides(&GenerateSlidesParams {
                    markdown: &markdown,
                })
            });
        match result {
            Ok(result) => {
                self.mark_finalizing(ticket);
                Ok(self.finish_generation(ticket, Ok(result)))
            }
            Err(e) if self.is_current(ticket) => {
                self.pending = None;
                self.record_failure(&e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
