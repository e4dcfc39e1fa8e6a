//! Configuration for the Sahaay conversation core.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable overriding the Ollama base URL.
pub const OLLAMA_URL_ENV: &str = "SAHAAY_OLLAMA_URL";
/// Environment variable overriding the generation model name.
pub const MODEL_ENV: &str = "SAHAAY_MODEL";
/// Environment variable overriding the SQLite database path.
pub const DB_PATH_ENV: &str = "SAHAAY_DB_PATH";

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or empty.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// A base URL could not be parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Top-level configuration for the conversation core.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SahaayConfig {
    /// Assistant identity and locality settings.
    pub assistant: AssistantConfig,
    /// Remote text-generation settings.
    pub generation: GenerationConfig,
    /// History window settings.
    pub history: HistoryConfig,
    /// Attachment intake settings.
    pub attachments: AttachmentConfig,
    /// Persistence settings.
    pub storage: StorageConfig,
}

impl SahaayConfig {
    /// Build a configuration from environment overrides on top of defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(OLLAMA_URL_ENV) {
            config.generation.base_url = url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.generation.model = model;
        }
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            config.storage.db_path = PathBuf::from(path);
        }
        config
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.handle.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "assistant.handle must not be empty".to_string(),
            ));
        }

        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "generation.model must not be empty".to_string(),
            ));
        }

        if self.history.window == 0 {
            return Err(ConfigError::Invalid(
                "history.window must be > 0".to_string(),
            ));
        }

        if self.attachments.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "attachments.max_bytes must be > 0".to_string(),
            ));
        }

        Url::parse(&self.generation.base_url)?;

        Ok(())
    }
}

/// Assistant identity settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Mention handle matched case-insensitively in group chats.
    pub handle: String,
    /// Fixed locality string used for hyperlocal context.
    pub locality: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            handle: "@sahaay".to_string(),
            locality: "Indiranagar, Bengaluru".to_string(),
        }
    }
}

/// Remote text-generation settings for the Ollama collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name as installed in Ollama.
    pub model: String,
    /// How long Ollama keeps the model resident.
    pub keep_alive: String,
    /// Context length (tokens) passed per request.
    pub num_ctx: u32,
    /// Token budget for each generation.
    pub num_predict: u32,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds; the pipeline adds no timeout of
    /// its own.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "mistral:7b-instruct-q8_0".to_string(),
            keep_alive: "1h".to_string(),
            num_ctx: 8_192,
            num_predict: 512,
            connect_timeout_secs: 5,
            timeout_secs: 120,
        }
    }
}

/// History window settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of trailing prior messages sent with each generation request.
    pub window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// Attachment intake settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// Largest accepted attachment in bytes.
    pub max_bytes: u64,
    /// Delay before the demo bill-recognition reply is appended.
    pub bill_delay_ms: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            bill_delay_ms: 2_000,
        }
    }
}

/// Persistence settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("sahaay.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SahaayConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_history_window_is_rejected() {
        let mut config = SahaayConfig::default();
        config.history.window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = SahaayConfig::default();
        config.generation.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Url(_))));
    }

    #[test]
    fn empty_handle_is_rejected() {
        let mut config = SahaayConfig::default();
        config.assistant.handle = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
