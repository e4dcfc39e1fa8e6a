//! Hyperlocal context lookup for a fixed locality.

use serde::{Deserialize, Serialize};

use super::EnrichFuture;

/// Locality signal attached to generation requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalitySignal {
    /// Locality name the notes apply to.
    pub area: String,
    /// Current neighbourhood notes, one line each.
    pub notes: Vec<String>,
}

impl LocalitySignal {
    /// Empty default, used when location services are not consented.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the signal carries any context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Provider collaborator for the locality enrichment signal.
pub trait LocalityProvider: Send + Sync {
    /// Current context for the provider's configured locality.
    fn context(&self) -> EnrichFuture<'_, LocalitySignal>;
}

/// Fixed provider returning canned neighbourhood notes.
///
/// Stands in for a civic-data feed; the pipeline only sees the signal shape.
pub struct StaticLocalityProvider {
    signal: LocalitySignal,
}

impl StaticLocalityProvider {
    /// Create a provider for `area` with the default note set.
    #[must_use]
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            signal: LocalitySignal {
                area: area.into(),
                notes: vec![
                    "Scheduled power maintenance on the 100 Feet Road stretch this week".to_string(),
                    "Water tanker bookings are running a day behind".to_string(),
                ],
            },
        }
    }

    /// Create a provider with explicit notes.
    #[must_use]
    pub fn with_notes(area: impl Into<String>, notes: Vec<String>) -> Self {
        Self {
            signal: LocalitySignal {
                area: area.into(),
                notes,
            },
        }
    }
}

impl LocalityProvider for StaticLocalityProvider {
    fn context(&self) -> EnrichFuture<'_, LocalitySignal> {
        let signal = self.signal.clone();
        Box::pin(async move { signal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provider_returns_its_configured_area() {
        let provider = StaticLocalityProvider::new("Indiranagar, Bengaluru");
        let signal = provider.context().await;
        assert_eq!(signal.area, "Indiranagar, Bengaluru");
        assert!(!signal.is_empty());
    }

    #[test]
    fn empty_signal_has_no_notes() {
        let signal = LocalitySignal::empty();
        assert!(signal.is_empty());
        assert!(signal.area.is_empty());
    }
}
