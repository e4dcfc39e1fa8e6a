//! Image attachment intake and the demonstration bill reply.
//!
//! The "bill recognized" response is a hardcoded stand-in for a document
//! understanding pipeline that is not connected; it is labelled as such in
//! its disclaimer so nothing pretends otherwise.

use thiserror::Error;

use crate::chat::message::{Message, ReplyAnnotation};

/// Validation failures for attachments.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Attachment exceeds the size limit.
    #[error("the file is too large ({size_bytes} bytes; the limit is {max_bytes} bytes)")]
    TooLarge {
        /// Size of the rejected file.
        size_bytes: u64,
        /// Configured limit.
        max_bytes: u64,
    },
    /// Non-image MIME type.
    #[error("unsupported attachment type: {0}")]
    UnsupportedType(String),
}

/// A file selected by the user.
#[derive(Clone, Debug)]
pub struct Attachment {
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the picker.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

impl Attachment {
    /// Whether the reported MIME type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Validate type and size against `max_bytes`.
    ///
    /// # Errors
    /// Returns the reason the attachment cannot be processed.
    pub fn validate(&self, max_bytes: u64) -> Result<(), AttachmentError> {
        if !self.is_image() {
            return Err(AttachmentError::UnsupportedType(self.mime_type.clone()));
        }

        if self.size_bytes > max_bytes {
            return Err(AttachmentError::TooLarge {
                size_bytes: self.size_bytes,
                max_bytes,
            });
        }

        Ok(())
    }
}

/// Outcome of one attachment intake.
#[derive(Clone, Debug, PartialEq)]
pub enum AttachOutcome {
    /// The demo bill reply was appended.
    Recognized(Message),
    /// Validation failed; an inline error message was appended instead.
    Rejected,
    /// Non-image file; silently ignored.
    Ignored,
}

/// Disclaimer attached to the demonstration bill reply.
pub(crate) const BILL_DEMO_DISCLAIMER: &str =
    "Demonstration response; document analysis is not connected yet.";

/// The canned bill-recognition reply.
pub(crate) fn demo_bill_reply() -> Message {
    Message::ai_bill(
        "This looks like a BESCOM electricity bill. Amount due: \u{20b9}1,450, payable by the \
         28th. I can take it from here:",
        vec!["Create Payment Link".to_string(), "Set Reminder".to_string()],
        ReplyAnnotation {
            confidence: 0.85,
            disclaimer: BILL_DEMO_DISCLAIMER.to_string(),
            needs_permission: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::MessageBody;

    fn image(size_bytes: u64) -> Attachment {
        Attachment {
            file_name: "bill.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes,
        }
    }

    #[test]
    fn images_within_the_limit_pass() {
        assert!(image(1024).validate(10 * 1024 * 1024).is_ok());
    }

    #[test]
    fn oversized_images_are_rejected() {
        let result = image(11 * 1024 * 1024).validate(10 * 1024 * 1024);
        assert!(matches!(result, Err(AttachmentError::TooLarge { .. })));
    }

    #[test]
    fn non_image_types_are_rejected() {
        let attachment = Attachment {
            file_name: "notes.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 10,
        };
        assert!(!attachment.is_image());
        assert!(matches!(
            attachment.validate(u64::MAX),
            Err(AttachmentError::UnsupportedType(_))
        ));
    }

    #[test]
    fn demo_reply_carries_action_items() {
        let reply = demo_bill_reply();
        match reply.body {
            MessageBody::Bill {
                ref action_items, ..
            } => {
                assert_eq!(action_items, &["Create Payment Link", "Set Reminder"]);
            }
            _ => panic!("expected a bill body"),
        }
        assert_eq!(reply.disclaimer(), Some(BILL_DEMO_DISCLAIMER));
    }
}
