//! Error taxonomy for the chat core.
//!
//! No failure here is fatal to the process: storage errors abort the current
//! operation after telling the user, generation errors degrade into a canned
//! fallback reply, and attachment validation errors are reported inline as a
//! chat message.

use thiserror::Error;

use crate::llm::GenerationError;
use crate::pipeline::attachments::AttachmentError;
use crate::storage::StorageError;

/// Top-level error for chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Persistence layer failure; surfaced to the user, operation aborted.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Remote generation failure; normally converted into a fallback reply
    /// rather than propagated.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Bad attachment; reported inline, never a blocking dialog.
    #[error("invalid attachment: {0}")]
    Validation(#[from] AttachmentError),
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
