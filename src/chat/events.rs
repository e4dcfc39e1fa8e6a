//! Events emitted by the send pipeline.
//!
//! Consumers (chat list, typing indicator) subscribe to these instead of
//! threading callbacks through the pipeline.

use crate::chat::ids::ChatId;

/// Maximum characters kept in a chat-list preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Broadcast event describing pipeline progress for one chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    /// The assistant started (`active = true`) or stopped generating.
    Generating {
        /// Chat the indicator belongs to.
        chat_id: ChatId,
        /// Whether generation is currently in progress.
        active: bool,
    },
    /// A chat gained a new assistant reply.
    ///
    /// Emitted once per successful generation; `preview` is capped at
    /// [`PREVIEW_MAX_CHARS`] characters for list screens.
    ChatUpdated {
        /// Chat that was updated.
        chat_id: ChatId,
        /// Truncated text of the new last message.
        preview: String,
    },
}

/// Truncate reply text to a chat-list preview.
#[must_use]
pub fn preview_of(text: &str) -> String {
    text.chars().take(PREVIEW_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_kept_whole() {
        assert_eq!(preview_of("see you at the park"), "see you at the park");
    }

    #[test]
    fn long_text_is_capped_at_one_hundred_chars() {
        let long = "x".repeat(500);
        assert_eq!(preview_of(&long).chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "ನಮಸ್ಕಾರ ".repeat(40);
        let preview = preview_of(&long);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(long.starts_with(&preview));
    }
}
