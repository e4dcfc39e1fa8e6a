//! Consent-gated enrichment signals attached to generation requests.
//!
//! Each signal is optional: when the corresponding consent flag is off the
//! pipeline substitutes a neutral/empty default and never calls the
//! collaborator.

use std::future::Future;
use std::pin::Pin;

/// Hyperlocal context lookup.
pub mod locality;
/// Mood classification of user input.
pub mod mood;

pub use locality::{LocalityProvider, LocalitySignal, StaticLocalityProvider};
pub use mood::{HeuristicMoodClassifier, Mood, MoodClassifier, MoodSignal};

/// Boxed future type for enrichment lookups.
pub type EnrichFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
