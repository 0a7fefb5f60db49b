//! Blocking client for the Gemini `generateContent` endpoint.

use super::TextGenerator;
use crate::config::AiSettings;
use crate::error::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Gemini text generation over HTTPS.
pub struct GeminiClient {
    agent: ureq::Agent,
    base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(settings: &AiSettings, api_key: impl Into<String>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if settings.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        }
        Self {
            agent: builder.build(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.into(),
        }
    }

    /// Build a client with the key read from `settings.api_key_env`.
    pub fn from_env(settings: &AiSettings) -> Result<Self> {
        match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(settings, key.trim())),
            _ => Err(Error::MissingApiKey {
                env_var: settings.api_key_env.clone(),
            }),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        info!("Requesting slide content from {}", self.model);
        let response = self
            .agent
            .post(&self.endpoint())
            .query("key", &self.api_key)
            .send_json(&body)
            .map_err(request_error)?;

        let parsed: GenerateResponse = response.into_json().map_err(|e| Error::Generation {
            message: format!("Invalid response from model: {}", e),
        })?;

        let text = parsed.text();
        debug!("Model returned {} bytes of text", text.len());
        Ok(text)
    }
}

/// Turn a ureq failure into a generation error carrying the server's message.
fn request_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            Error::Generation {
                message: status_message(code, &body),
            }
        }
        ureq::Error::Transport(transport) => Error::Generation {
            message: transport.to_string(),
        },
    }
}

fn status_message(code: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => format!("Request failed with status {}", code),
        Err(_) => format!("Request failed with status {}: {}", code, body.trim()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
