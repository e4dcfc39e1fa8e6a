//! Remote text-generation collaborator.
//!
//! The pipeline treats generation as an opaque, fallible, possibly slow
//! function: one call per send, no retries, no streaming. Timeouts are the
//! implementation's responsibility.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::chat::message::Message;
use crate::enrichment::{LocalitySignal, MoodSignal};

/// Ollama-backed generator.
pub mod ollama;

pub use ollama::OllamaGenerator;

/// Boxed future type for generation calls.
pub type GenerateFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors produced by the remote text-generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP client failure (connect, timeout, transport).
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("response service returned status {0}")]
    Status(u16),
    /// The response payload carried no usable text.
    #[error("response payload was malformed")]
    MalformedResponse,
    /// The generator was built from unusable settings.
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}

/// Inputs to one generation call.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Raw user input text.
    pub input: String,
    /// Mood enrichment signal (zero-confidence neutral when not consented).
    pub mood: MoodSignal,
    /// Locality enrichment signal (empty when not consented).
    pub locality: LocalitySignal,
    /// Trailing window of prior messages, oldest first.
    pub history: Vec<Message>,
    /// Whether the input addresses the assistant by its handle.
    pub mentions_assistant: bool,
}

/// Remote text-generation function.
pub trait Generator: Send + Sync {
    /// Generate a reply for `request`.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> GenerateFuture<'_, Result<String, GenerationError>>;
}
