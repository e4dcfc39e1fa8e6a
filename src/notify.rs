//! User-facing transient notifications.
//!
//! Fire-and-forget: the pipeline never waits on or inspects the outcome of a
//! notice. The real toast surface lives outside this crate.

use tracing::{error, info};

/// Transient notice collaborator.
pub trait Notifier: Send + Sync {
    /// Informational notice.
    fn info(&self, message: &str);

    /// Error notice.
    fn error(&self, message: &str);
}

/// Notifier that routes notices through the tracing subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!(target: "sahaay::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "sahaay::notify", "{message}");
    }
}
