//! Generative text API
//!
//! Slide generation depends on a model only through [`TextGenerator`]; the
//! shipped implementation is [`GeminiClient`].

mod gemini;
mod prompt;

pub use gemini::GeminiClient;
pub use prompt::{wrap_generated, SlidePrompt, GENERATED_DECK_HEADER, NO_INSTRUCTIONS};

use crate::error::Result;

/// Something that turns a prompt into text.
pub trait TextGenerator {
    /// Generate text for `prompt`. An empty string is a valid answer; callers
    /// decide whether that is an error.
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}
