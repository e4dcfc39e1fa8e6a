//! Startup helpers and terminal chat loop for Sahaay.
//!
//! Wires the SQLite-backed store, the Ollama generator, and the enrichment
//! collaborators into one pipeline, then reads user turns from stdin.

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_rusqlite::Connection;

use crate::chat::Consents;
use crate::chat::events::ChatEvent;
use crate::chat::ids::ChatId;
use crate::config::SahaayConfig;
use crate::enrichment::{HeuristicMoodClassifier, StaticLocalityProvider};
use crate::llm::OllamaGenerator;
use crate::notify::TracingNotifier;
use crate::pipeline::{SendOutcome, SendPipeline};
use crate::storage::{ChatDirectory, ChatLog, SqliteChatDirectory, SqliteKeyValueStore};

/// Environment flag for mood-detection consent (default on; set to `off`,
/// `false`, `no`, or `0` to withhold).
pub const MOOD_CONSENT_ENV: &str = "SAHAAY_CONSENT_MOOD";
/// Environment flag for location-services consent (same values).
pub const LOCATION_CONSENT_ENV: &str = "SAHAAY_CONSENT_LOCATION";

/// Run the terminal chat (used by the `sahaay` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Sahaay v{}", env!("CARGO_PKG_VERSION"));

    let config = SahaayConfig::from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        return ExitCode::from(1);
    }
    tracing::info!("Ollama endpoint: {}", config.generation.base_url);
    tracing::info!("Database: {}", config.storage.db_path.display());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let pipeline = match rt.block_on(build_pipeline(config)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("Failed to start: {e}");
            return ExitCode::from(1);
        }
    };

    let consents = consents_from_env();
    let chat_id = ChatId::new("terminal");

    println!("Sahaay is ready. Type a message, or \"exit\" to quit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read input: {e}");
                break;
            }
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match rt.block_on(pipeline.send_text(&chat_id, input, consents)) {
            Ok(SendOutcome::Replied(reply)) => println!("{}", reply.display_text()),
            Ok(SendOutcome::Ignored) => {}
            Err(e) => tracing::error!("Send failed: {e}"),
        }
    }

    ExitCode::SUCCESS
}

/// Build the pipeline over a SQLite database at the configured path.
///
/// Also spawns the background task keeping the chat directory in sync with
/// pipeline events.
///
/// # Errors
/// Returns an error if the database or any collaborator cannot be set up.
pub async fn build_pipeline(
    config: SahaayConfig,
) -> Result<Arc<SendPipeline>, Box<dyn std::error::Error + Send + Sync>> {
    let conn = Arc::new(Connection::open(config.storage.db_path.clone()).await?);
    let store = Arc::new(SqliteKeyValueStore::new(conn.clone()).await?);
    let directory: Arc<dyn ChatDirectory> = Arc::new(SqliteChatDirectory::new(conn).await?);

    let generator = Arc::new(OllamaGenerator::new(config.generation.clone())?);
    let mood = Arc::new(HeuristicMoodClassifier::new()?);
    let locality = Arc::new(StaticLocalityProvider::new(config.assistant.locality.clone()));

    let pipeline = Arc::new(SendPipeline::new(
        config,
        Arc::new(ChatLog::new(store)),
        generator,
        mood,
        locality,
        Arc::new(TracingNotifier),
    ));

    spawn_directory_updater(pipeline.subscribe(), directory);

    Ok(pipeline)
}

/// Forward `ChatUpdated` events into the chat directory.
///
/// Runs until the pipeline (and with it the event sender) is dropped.
fn spawn_directory_updater(
    mut events: broadcast::Receiver<ChatEvent>,
    directory: Arc<dyn ChatDirectory>,
) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ChatEvent::ChatUpdated { chat_id, preview }) => {
                    let now_ms = chrono::Utc::now().timestamp_millis();
                    if let Err(e) = directory.record_activity(&chat_id, &preview, now_ms).await {
                        tracing::warn!("Failed to record chat activity: {e}");
                    }
                }
                Ok(ChatEvent::Generating { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event stream lagged; skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Read consent flags from the environment; both default to granted.
#[must_use]
pub fn consents_from_env() -> Consents {
    Consents {
        mood_detection: consent_granted(std::env::var(MOOD_CONSENT_ENV).ok().as_deref()),
        location_services: consent_granted(std::env::var(LOCATION_CONSENT_ENV).ok().as_deref()),
    }
}

fn consent_granted(value: Option<&str>) -> bool {
    value.is_none_or(|v| {
        !matches!(
            v.trim().to_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_consent_defaults_to_granted() {
        assert!(consent_granted(None));
    }

    #[test]
    fn negative_values_withhold_consent() {
        for value in ["0", "false", "OFF", " no "] {
            assert!(!consent_granted(Some(value)));
        }
    }

    #[test]
    fn other_values_grant_consent() {
        assert!(consent_granted(Some("1")));
        assert!(consent_granted(Some("on")));
    }
}
