//! Heuristic mood classification of user input.
//!
//! Pattern matching over a fixed rule list; the first matching rule wins.
//! This stands in for a real affect model but produces the same signal
//! shape, so swapping one in is a trait impl away.

use core::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::EnrichFuture;

/// Coarse mood label.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// No strong signal.
    Neutral,
    /// Positive affect.
    Happy,
    /// Under pressure.
    Stressed,
    /// Irritation or anger.
    Frustrated,
    /// Anxiety or fear.
    Worried,
}

impl Mood {
    /// Stable string form for prompts and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Stressed => "stressed",
            Self::Frustrated => "frustrated",
            Self::Worried => "worried",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mood signal with a confidence in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodSignal {
    /// Detected mood.
    pub mood: Mood,
    /// Confidence in the detection.
    pub confidence: f32,
}

impl MoodSignal {
    /// Zero-confidence neutral default, used when mood detection is not
    /// consented.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            mood: Mood::Neutral,
            confidence: 0.0,
        }
    }
}

/// Classifier collaborator for the mood enrichment signal.
pub trait MoodClassifier: Send + Sync {
    /// Classify the mood of `text`.
    fn classify(&self, text: &str) -> EnrichFuture<'_, MoodSignal>;
}

/// A pattern rule mapping a regex to a mood.
struct MoodRule {
    pattern: Regex,
    mood: Mood,
    confidence: f32,
}

/// Regex-based classifier; rules are checked in order, first match wins.
pub struct HeuristicMoodClassifier {
    rules: Vec<MoodRule>,
    neutral_confidence: f32,
}

impl HeuristicMoodClassifier {
    /// Confidence reported when no rule matches.
    const NEUTRAL_CONFIDENCE: f32 = 0.2;

    /// Create a classifier with the built-in rule set.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        let rules = vec![
            MoodRule {
                pattern: Regex::new(
                    r"(?i)\b(angry|furious|annoyed|frustrat(ed|ing)|fed up|ridiculous|worst)\b",
                )?,
                mood: Mood::Frustrated,
                confidence: 0.8,
            },
            MoodRule {
                pattern: Regex::new(
                    r"(?i)\b(stress(ed)?|overwhelmed|deadline|too much|under pressure|exhausted)\b",
                )?,
                mood: Mood::Stressed,
                confidence: 0.75,
            },
            MoodRule {
                pattern: Regex::new(r"(?i)\b(worried|anxious|scared|afraid|nervous|tension)\b")?,
                mood: Mood::Worried,
                confidence: 0.7,
            },
            MoodRule {
                pattern: Regex::new(
                    r"(?i)\b(great|awesome|wonderful|thanks|thank you|happy|love(ly)?)\b",
                )?,
                mood: Mood::Happy,
                confidence: 0.7,
            },
        ];

        Ok(Self {
            rules,
            neutral_confidence: Self::NEUTRAL_CONFIDENCE,
        })
    }

    fn classify_text(&self, text: &str) -> MoodSignal {
        for rule in &self.rules {
            if rule.pattern.is_match(text) {
                return MoodSignal {
                    mood: rule.mood,
                    confidence: rule.confidence,
                };
            }
        }

        MoodSignal {
            mood: Mood::Neutral,
            confidence: self.neutral_confidence,
        }
    }
}

impl MoodClassifier for HeuristicMoodClassifier {
    fn classify(&self, text: &str) -> EnrichFuture<'_, MoodSignal> {
        let signal = self.classify_text(text);
        Box::pin(async move { signal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeuristicMoodClassifier {
        HeuristicMoodClassifier::new().expect("valid rules")
    }

    #[tokio::test]
    async fn frustration_is_detected() {
        let signal = classifier()
            .classify("the power cut again, this is ridiculous")
            .await;
        assert_eq!(signal.mood, Mood::Frustrated);
        assert!((signal.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn plain_text_falls_back_to_neutral() {
        let signal = classifier().classify("what time is the meeting").await;
        assert_eq!(signal.mood, Mood::Neutral);
        assert!(signal.confidence > 0.0);
    }

    #[tokio::test]
    async fn first_matching_rule_wins() {
        // Contains both a frustration and a happiness keyword.
        let signal = classifier().classify("I am so annoyed, but thanks anyway").await;
        assert_eq!(signal.mood, Mood::Frustrated);
    }

    #[test]
    fn disabled_signal_is_zero_confidence_neutral() {
        let signal = MoodSignal::disabled();
        assert_eq!(signal.mood, Mood::Neutral);
        assert!((signal.confidence - 0.0).abs() < f32::EPSILON);
    }
}
