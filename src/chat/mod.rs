//! Chat data model.
//!
//! This module is intentionally **type-heavy** and **logic-light**: it holds
//! the identifiers, the message sum type, the pipeline events, and the error
//! taxonomy shared by the rest of the crate.

/// Error taxonomy for chat operations.
pub mod errors;
/// Events emitted by the send pipeline.
pub mod events;
/// Strongly-typed chat and message identifiers.
pub mod ids;
/// Message model for chat threads.
pub mod message;

/// Consent flags supplied by the caller.
///
/// Read-only input to the send pipeline; each flag gates one optional
/// enrichment step before a generation call. Defaults are all off.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Consents {
    /// Allow mood classification of the user's input text.
    pub mood_detection: bool,
    /// Allow hyperlocal context lookup for the configured locality.
    pub location_services: bool,
}

impl Consents {
    /// Consents with every capability granted.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            mood_detection: true,
            location_services: true,
        }
    }
}
