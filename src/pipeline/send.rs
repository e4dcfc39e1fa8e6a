//! Send pipeline orchestration.
//!
//! One send walks Idle -> UserEchoed -> AwaitingReply -> Resolved:
//! guard, echo the user message, gather consent-gated enrichment signals,
//! call the generator, then append either the AI reply or the canned
//! fallback. At most one send is in flight per chat; the guard is an RAII
//! entry so every exit path releases it. Cancellation is not supported.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::chat::Consents;
use crate::chat::errors::ChatResult;
use crate::chat::events::{ChatEvent, preview_of};
use crate::chat::ids::ChatId;
use crate::chat::message::{Message, ReplyAnnotation};
use crate::config::SahaayConfig;
use crate::enrichment::{LocalityProvider, LocalitySignal, MoodClassifier, MoodSignal};
use crate::llm::{GenerationRequest, Generator};
use crate::notify::Notifier;
use crate::storage::ChatLog;

use super::attachments::{AttachOutcome, Attachment, demo_bill_reply};
use super::fallback::fallback_text;

/// Notice attached to every generated reply.
const AI_DISCLAIMER: &str =
    "AI-generated response. Verify important information independently.";
/// Notice attached to canned fallback replies.
const FALLBACK_DISCLAIMER: &str = "Offline suggestion; not generated by the AI service.";
/// Notice attached to inline attachment-validation messages.
const VALIDATION_DISCLAIMER: &str = "Attachment check failed before any analysis ran.";
/// Confidence recorded on fallback replies.
const FALLBACK_CONFIDENCE: f32 = 0.1;
/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 64;

/// Outcome of one send or attach invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum SendOutcome {
    /// A reply (AI or fallback) was produced.
    Replied(Message),
    /// Empty input, or another send was already in flight for this chat.
    Ignored,
}

/// Orchestrates one user input into stored messages and an optional reply.
pub struct SendPipeline {
    config: SahaayConfig,
    log: Arc<ChatLog>,
    generator: Arc<dyn Generator>,
    mood: Arc<dyn MoodClassifier>,
    locality: Arc<dyn LocalityProvider>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<ChatEvent>,
    in_flight: DashMap<ChatId, ()>,
}

/// RAII entry in the in-flight map; dropped on every exit path.
struct FlightGuard<'a> {
    flights: &'a DashMap<ChatId, ()>,
    chat_id: ChatId,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flights.remove(&self.chat_id);
    }
}

impl SendPipeline {
    /// Create a pipeline over the given collaborators.
    #[must_use]
    pub fn new(
        config: SahaayConfig,
        log: Arc<ChatLog>,
        generator: Arc<dyn Generator>,
        mood: Arc<dyn MoodClassifier>,
        locality: Arc<dyn LocalityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            log,
            generator,
            mood,
            locality,
            notifier,
            events,
            in_flight: DashMap::new(),
        }
    }

    /// Subscribe to pipeline events (typing indicator, chat-list updates).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Read the full message sequence of a chat.
    ///
    /// # Errors
    /// Returns an error if storage fails.
    pub async fn messages(&self, chat_id: &ChatId) -> ChatResult<Vec<Message>> {
        Ok(self.log.messages(chat_id).await?)
    }

    /// Send one user text input.
    ///
    /// Empty (after trimming) input and sends issued while another send is
    /// in flight for the same chat are no-ops.
    ///
    /// # Errors
    /// Returns a storage error if the user echo or the success-path reply
    /// cannot be persisted; generation failures are absorbed into the
    /// fallback reply and are not errors.
    pub async fn send_text(
        &self,
        chat_id: &ChatId,
        input: &str,
        consents: Consents,
    ) -> ChatResult<SendOutcome> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let Some(_flight) = self.begin_flight(chat_id) else {
            debug!(chat = %chat_id, "send already in flight; ignoring input");
            return Ok(SendOutcome::Ignored);
        };

        let history = self
            .append_or_report(chat_id, Message::user_text(trimmed))
            .await?;

        self.emit(ChatEvent::Generating {
            chat_id: chat_id.clone(),
            active: true,
        });
        let resolved = self.resolve(chat_id, trimmed, &history, consents).await;
        self.emit(ChatEvent::Generating {
            chat_id: chat_id.clone(),
            active: false,
        });

        Ok(SendOutcome::Replied(resolved?))
    }

    /// Handle a file selected by the user.
    ///
    /// Non-image files are silently ignored, as is an attachment arriving
    /// while a send or another attachment is in flight for the same chat
    /// (appends to one chat never interleave). Valid images get the
    /// demonstration bill reply after a fixed delay; invalid ones get an
    /// inline error message.
    ///
    /// # Errors
    /// Returns a storage error if any append fails.
    pub async fn attach_file(
        &self,
        chat_id: &ChatId,
        attachment: &Attachment,
    ) -> ChatResult<AttachOutcome> {
        if !attachment.is_image() {
            debug!(
                file = %attachment.file_name,
                mime = %attachment.mime_type,
                "ignoring non-image attachment"
            );
            return Ok(AttachOutcome::Ignored);
        }

        let Some(_flight) = self.begin_flight(chat_id) else {
            debug!(chat = %chat_id, "send already in flight; ignoring attachment");
            return Ok(AttachOutcome::Ignored);
        };

        self.append_or_report(chat_id, Message::user_image(&attachment.file_name))
            .await?;

        if let Err(reason) = attachment.validate(self.config.attachments.max_bytes) {
            let message = Message::ai_text(
                format!("I couldn't read that file: {reason}"),
                ReplyAnnotation {
                    confidence: 0.0,
                    disclaimer: VALIDATION_DISCLAIMER.to_string(),
                    needs_permission: None,
                },
            );
            self.append_or_report(chat_id, message).await?;
            return Ok(AttachOutcome::Rejected);
        }

        sleep(Duration::from_millis(self.config.attachments.bill_delay_ms)).await;

        let reply = demo_bill_reply();
        self.append_or_report(chat_id, reply.clone()).await?;
        Ok(AttachOutcome::Recognized(reply))
    }

    fn begin_flight(&self, chat_id: &ChatId) -> Option<FlightGuard<'_>> {
        match self.in_flight.entry(chat_id.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(FlightGuard {
                    flights: &self.in_flight,
                    chat_id: chat_id.clone(),
                })
            }
        }
    }

    async fn resolve(
        &self,
        chat_id: &ChatId,
        input: &str,
        history: &[Message],
        consents: Consents,
    ) -> ChatResult<Message> {
        let (mood, locality) = tokio::join!(
            async {
                if consents.mood_detection {
                    self.mood.classify(input).await
                } else {
                    MoodSignal::disabled()
                }
            },
            async {
                if consents.location_services {
                    self.locality.context().await
                } else {
                    LocalitySignal::empty()
                }
            },
        );

        // History excludes the just-echoed input; the generator receives it
        // separately as the current turn.
        let prior = &history[..history.len().saturating_sub(1)];
        let window_start = prior.len().saturating_sub(self.config.history.window);
        let request = GenerationRequest {
            input: input.to_string(),
            mood: mood.clone(),
            locality,
            history: prior[window_start..].to_vec(),
            mentions_assistant: mentions_handle(input, &self.config.assistant.handle),
        };

        match self.generator.generate(request).await {
            Ok(text) => {
                let reply = Message::ai_text(
                    text,
                    ReplyAnnotation {
                        confidence: mood.confidence,
                        disclaimer: AI_DISCLAIMER.to_string(),
                        needs_permission: (!consents.mood_detection)
                            .then(|| "moodDetection".to_string()),
                    },
                );
                self.append_or_report(chat_id, reply.clone()).await?;
                self.emit(ChatEvent::ChatUpdated {
                    chat_id: chat_id.clone(),
                    preview: preview_of(&reply.display_text()),
                });
                Ok(reply)
            }
            Err(err) => {
                warn!(chat = %chat_id, error = %err, "generation failed; substituting fallback");
                let reply = Message::ai_text(
                    fallback_text(input),
                    ReplyAnnotation {
                        confidence: FALLBACK_CONFIDENCE,
                        disclaimer: FALLBACK_DISCLAIMER.to_string(),
                        needs_permission: None,
                    },
                );
                // A secondary storage failure here is logged, not propagated:
                // the user already gets the transient failure notice.
                if let Err(store_err) = self.log.append(chat_id, reply.clone()).await {
                    error!(chat = %chat_id, error = %store_err, "failed to store fallback reply");
                }
                self.notifier
                    .error("Sahaay couldn't reach the response service; showing an offline suggestion.");
                Ok(reply)
            }
        }
    }

    async fn append_or_report(&self, chat_id: &ChatId, message: Message) -> ChatResult<Vec<Message>> {
        match self.log.append(chat_id, message).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                self.notifier
                    .error(&format!("Couldn't update this chat: {err}"));
                Err(err.into())
            }
        }
    }

    fn emit(&self, event: ChatEvent) {
        // Nobody listening is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

/// Case-insensitive check for the assistant's mention handle.
fn mentions_handle(text: &str, handle: &str) -> bool {
    text.to_lowercase().contains(&handle.to_lowercase())
}
