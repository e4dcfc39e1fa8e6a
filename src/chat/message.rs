//! Message model for chat threads.
//!
//! A message is created exactly once, appended once, and never mutated.
//! Per-kind payload fields live in [`MessageBody`] so that "which metadata is
//! valid for which message kind" is checked at compile time rather than being
//! a bag of optional attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ids::MessageId;

/// Originator of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The human in the chat.
    User,
    /// The assistant.
    Ai,
}

impl Sender {
    /// Stable string form for storage and prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// Annotation attached to assistant-produced content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplyAnnotation {
    /// Confidence in the reply, in `0.0..=1.0`.
    pub confidence: f32,
    /// Notice shown to the user alongside the content.
    pub disclaimer: String,
    /// Consent the assistant would need to improve future replies.
    pub needs_permission: Option<String>,
}

/// Payload of a message, scoped per kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text; annotated when assistant-generated.
    Text {
        /// The text content.
        text: String,
        /// Present on assistant replies.
        annotation: Option<ReplyAnnotation>,
    },
    /// An attached image, referenced by file name.
    Image {
        /// Original file name of the attachment.
        file_name: String,
    },
    /// A shared location.
    Location {
        /// Human-readable place description.
        place: String,
    },
    /// A recognized bill with follow-up actions.
    Bill {
        /// Summary text describing the bill.
        text: String,
        /// Ordered action labels offered to the user.
        action_items: Vec<String>,
        /// Present on assistant replies.
        annotation: Option<ReplyAnnotation>,
    },
}

/// One entry in a chat thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Who produced the message.
    pub sender: Sender,
    /// Creation time (serialized as RFC 3339).
    pub timestamp: DateTime<Utc>,
    /// Kind-scoped payload.
    pub body: MessageBody,
}

impl Message {
    fn new(sender: Sender, body: MessageBody) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            timestamp: Utc::now(),
            body,
        }
    }

    /// A plain text message typed by the user.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(
            Sender::User,
            MessageBody::Text {
                text: text.into(),
                annotation: None,
            },
        )
    }

    /// An image attached by the user.
    #[must_use]
    pub fn user_image(file_name: impl Into<String>) -> Self {
        Self::new(
            Sender::User,
            MessageBody::Image {
                file_name: file_name.into(),
            },
        )
    }

    /// An annotated assistant text reply.
    #[must_use]
    pub fn ai_text(text: impl Into<String>, annotation: ReplyAnnotation) -> Self {
        Self::new(
            Sender::Ai,
            MessageBody::Text {
                text: text.into(),
                annotation: Some(annotation),
            },
        )
    }

    /// An assistant bill-recognition reply with action items.
    #[must_use]
    pub fn ai_bill(
        text: impl Into<String>,
        action_items: Vec<String>,
        annotation: ReplyAnnotation,
    ) -> Self {
        Self::new(
            Sender::Ai,
            MessageBody::Bill {
                text: text.into(),
                action_items,
                annotation: Some(annotation),
            },
        )
    }

    /// Text shown for this message in previews, prompts, and the terminal.
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.body {
            MessageBody::Text { text, .. } | MessageBody::Bill { text, .. } => text.clone(),
            MessageBody::Image { file_name } => format!("[image] {file_name}"),
            MessageBody::Location { place } => place.clone(),
        }
    }

    /// Confidence of the assistant annotation, if any.
    #[must_use]
    pub fn confidence(&self) -> Option<f32> {
        match &self.body {
            MessageBody::Text { annotation, .. } | MessageBody::Bill { annotation, .. } => {
                annotation.as_ref().map(|a| a.confidence)
            }
            MessageBody::Image { .. } | MessageBody::Location { .. } => None,
        }
    }

    /// Disclaimer of the assistant annotation, if any.
    #[must_use]
    pub fn disclaimer(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { annotation, .. } | MessageBody::Bill { annotation, .. } => {
                annotation.as_ref().map(|a| a.disclaimer.as_str())
            }
            MessageBody::Image { .. } | MessageBody::Location { .. } => None,
        }
    }
}
