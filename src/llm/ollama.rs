//! Ollama-backed text generation.
//!
//! Behaviour:
//! - One `POST /api/generate` per request, non-streaming.
//! - Runtime options (`num_ctx`, `num_predict`) are passed per request.
//! - Enrichment signals, the history window, and the group-mention flag are
//!   rendered into the prompt; the pipeline never retries.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::GenerationConfig;

use super::{GenerateFuture, GenerationError, GenerationRequest, Generator};

/// System prompt for Sahaay.
const SYSTEM_PROMPT: &str = "You are Sahaay, a neighbourhood assistant for Indian localities. \
You help with routes and traffic, utility bills, group-chat summaries, weather, and translations. \
Be warm, practical, and concise. Never invent civic facts you were not given.";

#[derive(Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    keep_alive: &'a str,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: Option<String>,
}

/// Generator backed by a local or remote Ollama server.
pub struct OllamaGenerator {
    client: Client,
    config: GenerationConfig,
}

impl OllamaGenerator {
    /// Create a generator for the given settings.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        Url::parse(&config.base_url)
            .map_err(|e| GenerationError::InvalidConfig(format!("base_url: {e}")))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/generate",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn post_generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateBody {
            model: &self.config.model,
            prompt,
            stream: false,
            keep_alive: &self.config.keep_alive,
            options: GenerateOptions {
                num_ctx: self.config.num_ctx,
                num_predict: self.config.num_predict,
            },
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let reply = response.json::<GenerateReply>().await?;
        reply
            .response
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::MalformedResponse)
    }
}

/// Render a generation request into a single prompt string.
#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push('\n');

    if request.mood.confidence > 0.0 {
        prompt.push_str(&format!(
            "\nUser mood: {} (confidence {:.2})",
            request.mood.mood, request.mood.confidence
        ));
    }

    if !request.locality.is_empty() {
        prompt.push_str(&format!("\nLocal context for {}:", request.locality.area));
        for note in &request.locality.notes {
            prompt.push_str(&format!("\n- {note}"));
        }
    }

    if request.mentions_assistant {
        prompt.push_str(
            "\nThe user addressed you directly by your handle in a group chat; \
             answer on behalf of the group context.",
        );
    }

    if !request.history.is_empty() {
        prompt.push_str("\n\nRecent conversation:");
        for message in &request.history {
            let role = match message.sender {
                crate::chat::message::Sender::User => "User",
                crate::chat::message::Sender::Ai => "Sahaay",
            };
            prompt.push_str(&format!("\n{role}: {}", message.display_text()));
        }
    }

    prompt.push_str(&format!("\n\nUser: {}\nSahaay:", request.input));
    prompt
}

impl Generator for OllamaGenerator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> GenerateFuture<'_, Result<String, GenerationError>> {
        Box::pin(async move {
            let prompt = build_prompt(&request);
            self.post_generate(&prompt).await
        })
    }
}
