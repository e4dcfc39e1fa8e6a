//! Strongly-typed identifiers for chats and messages.
//!
//! ## Cargo features used by this module
//! - `uuid_v7`: message ids become time-ordered (`Uuid::now_v7`) for better
//!   storage locality; without it they are random v4. Either way ids do not
//!   depend on wall-clock granularity, so two messages created in the same
//!   millisecond cannot collide.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a message UUID.
#[inline]
#[must_use]
fn message_uuid() -> Uuid {
    #[cfg(feature = "uuid_v7")]
    {
        Uuid::now_v7()
    }
    #[cfg(not(feature = "uuid_v7"))]
    {
        Uuid::new_v4()
    }
}

/// Unique message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Create a new identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(message_uuid())
    }

    /// Wrap an existing UUID.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Chat identifier: an arbitrary caller-chosen string.
///
/// Storage keys are derived through [`ChatId::sanitized`] so that a hostile
/// or merely unusual id cannot escape the per-chat key namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Wrap a chat identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier reduced to a safe character set (`[A-Za-z0-9_-]`).
    ///
    /// Every other character maps to `_`. Used when deriving storage keys.
    #[must_use]
    pub fn sanitized(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_unique() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn message_id_round_trips_through_display() {
        let id = MessageId::new();
        let parsed: MessageId = id.to_string().parse().expect("valid uuid");
        assert_eq!(id, parsed);
    }

    #[test]
    fn sanitized_keeps_safe_characters() {
        let id = ChatId::new("family-group_42");
        assert_eq!(id.sanitized(), "family-group_42");
    }

    #[test]
    fn sanitized_replaces_unsafe_characters() {
        let id = ChatId::new("apartment 3B/../etc");
        assert_eq!(id.sanitized(), "apartment_3B_____etc");
    }
}
