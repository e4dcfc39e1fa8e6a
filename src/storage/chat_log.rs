//! Append-only message log per chat, layered over key-value storage.

use std::sync::Arc;

use crate::chat::ids::ChatId;
use crate::chat::message::Message;

use super::kv::{KeyValueStore, StoreResult};

/// Storage key prefix for per-chat message lists.
const KEY_PREFIX: &str = "sahaay_chat_";

/// Ordered, append-only log of messages keyed by chat id.
///
/// A chat that has never been written reads back as an empty sequence;
/// "not found" is not an error here. Appends are a pure transformation of
/// the last known sequence (read, push, write back), never a blind
/// overwrite of unrelated state.
pub struct ChatLog {
    store: Arc<dyn KeyValueStore>,
}

impl ChatLog {
    /// Create a log over the given key-value collaborator.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key_for(chat_id: &ChatId) -> String {
        format!("{KEY_PREFIX}{}", chat_id.sanitized())
    }

    /// Read the full message sequence for `chat_id` in insertion order.
    ///
    /// # Errors
    /// Returns an error if the backend fails or the payload is corrupt.
    pub async fn messages(&self, chat_id: &ChatId) -> StoreResult<Vec<Message>> {
        match self.store.read(&Self::key_for(chat_id)).await? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Append one message and return the updated sequence.
    ///
    /// # Errors
    /// Returns an error if the backend fails; nothing is appended then.
    pub async fn append(&self, chat_id: &ChatId, message: Message) -> StoreResult<Vec<Message>> {
        let mut messages = self.messages(chat_id).await?;
        messages.push(message);
        let encoded = serde_json::to_string(&messages)?;
        self.store.write(&Self::key_for(chat_id), &encoded).await?;
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::{MemoryKeyValueStore, SqliteKeyValueStore};
    use tokio_rusqlite::Connection;

    fn memory_log() -> ChatLog {
        ChatLog::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn unknown_chat_reads_as_empty() {
        let log = memory_log();
        let messages = log.messages(&ChatId::new("fresh")).await.expect("read");
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn append_returns_updated_sequence() {
        let log = memory_log();
        let chat = ChatId::new("street-group");
        let updated = log
            .append(&chat, Message::user_text("anyone up for chai?"))
            .await
            .expect("append");
        assert_eq!(updated.len(), 1);
        let updated = log
            .append(&chat, Message::user_text("meet at 5"))
            .await
            .expect("append");
        assert_eq!(updated.len(), 2);
    }

    #[tokio::test]
    async fn round_trip_preserves_order_and_fields() {
        let log = memory_log();
        let chat = ChatId::new("round-trip");
        let mut sent = Vec::new();
        for i in 0..7 {
            let message = Message::user_text(format!("message {i}"));
            sent.push(message.clone());
            log.append(&chat, message).await.expect("append");
        }
        let read = log.messages(&chat).await.expect("read");
        assert_eq!(read, sent);
    }

    #[tokio::test]
    async fn chats_are_isolated_by_id() {
        let log = memory_log();
        log.append(&ChatId::new("a"), Message::user_text("for a"))
            .await
            .expect("append");
        let other = log.messages(&ChatId::new("b")).await.expect("read");
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn sqlite_backend_round_trips() {
        let conn = Arc::new(Connection::open_in_memory().await.expect("open"));
        let store = SqliteKeyValueStore::new(conn).await.expect("init");
        let log = ChatLog::new(Arc::new(store));
        let chat = ChatId::new("durable");
        log.append(&chat, Message::user_text("persisted"))
            .await
            .expect("append");
        let read = log.messages(&chat).await.expect("read");
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].display_text(), "persisted");
    }
}
