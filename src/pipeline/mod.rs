//! Send pipeline: one user input in, zero or more stored messages out.

/// Image attachment intake and the demo bill reply.
pub mod attachments;
/// Canned suggestions for the offline fallback path.
pub mod fallback;
/// Pipeline orchestration.
pub mod send;

pub use attachments::{AttachOutcome, Attachment, AttachmentError};
pub use send::{SendOutcome, SendPipeline};
