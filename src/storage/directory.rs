//! SQLite-backed chat directory for the list screen.
//!
//! Tracks per-chat metadata (title, last preview, activity, message count)
//! separately from the message log so the list screen never has to decode
//! full threads. Updated by subscribing to [`crate::chat::events::ChatEvent`].

use std::sync::Arc;

use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use crate::chat::ids::ChatId;

use super::kv::{StoreFuture, StoreResult};

/// Metadata for a chat displayed in the list screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Chat identifier.
    pub id: String,
    /// Display title (empty until set).
    pub title: String,
    /// Truncated text of the most recent assistant reply.
    pub last_preview: String,
    /// Creation timestamp in milliseconds since Unix epoch.
    pub created_at: i64,
    /// Last activity timestamp in milliseconds since Unix epoch.
    pub updated_at: i64,
    /// Number of recorded replies.
    pub message_count: u32,
}

/// Trait for chat directory storage.
pub trait ChatDirectory: Send + Sync {
    /// List non-archived chats ordered by `updated_at` DESC.
    fn list_recent(&self) -> StoreFuture<'_, StoreResult<Vec<ChatSummary>>>;

    /// Get a chat by id, if present and not archived.
    fn get_by_id(&self, chat_id: &ChatId) -> StoreFuture<'_, StoreResult<Option<ChatSummary>>>;

    /// Record a new reply: bump activity, preview, and message count.
    /// Creates the row if the chat has never been seen.
    fn record_activity(
        &self,
        chat_id: &ChatId,
        preview: &str,
        now_ms: i64,
    ) -> StoreFuture<'_, StoreResult<()>>;

    /// Set the display title of a chat.
    fn set_title(&self, chat_id: &ChatId, title: &str) -> StoreFuture<'_, StoreResult<()>>;

    /// Archive a chat (soft delete; hidden from listings).
    fn archive(&self, chat_id: &ChatId) -> StoreFuture<'_, StoreResult<()>>;
}

/// `SQLite` implementation of the chat directory.
pub struct SqliteChatDirectory {
    conn: Arc<Connection>,
    table: String,
}

impl SqliteChatDirectory {
    /// Table name for chat metadata.
    pub const DEFAULT_TABLE: &'static str = "chats";

    /// Initialize the directory and create the table if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if database operations fail.
    pub async fn new(conn: Arc<Connection>) -> StoreResult<Self> {
        let table = Self::DEFAULT_TABLE.to_string();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL DEFAULT '',
                    last_preview TEXT NOT NULL DEFAULT '',
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    message_count INTEGER NOT NULL DEFAULT 0,
                    is_archived INTEGER NOT NULL DEFAULT 0
                );
                CREATE INDEX IF NOT EXISTS idx_{table_name}_updated
                    ON {table_name} (is_archived, updated_at DESC);"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }
}

impl ChatDirectory for SqliteChatDirectory {
    fn list_recent(&self) -> StoreFuture<'_, StoreResult<Vec<ChatSummary>>> {
        Box::pin(async move {
            let table = self.table.clone();
            let rows = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, title, last_preview, created_at, updated_at, message_count
                         FROM {table}
                         WHERE is_archived = 0
                         ORDER BY updated_at DESC
                         LIMIT 100"
                    ))?;
                    let rows = stmt
                        .query_map([], |row| {
                            Ok(ChatSummary {
                                id: row.get(0)?,
                                title: row.get(1)?,
                                last_preview: row.get(2)?,
                                created_at: row.get(3)?,
                                updated_at: row.get(4)?,
                                message_count: row.get(5)?,
                            })
                        })?
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(rows)
                })
                .await?;
            Ok(rows)
        })
    }

    fn get_by_id(&self, chat_id: &ChatId) -> StoreFuture<'_, StoreResult<Option<ChatSummary>>> {
        let id = chat_id.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let row = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, title, last_preview, created_at, updated_at, message_count
                         FROM {table}
                         WHERE id = ?1 AND is_archived = 0"
                    ))?;
                    let row = stmt
                        .query_row([&id], |row| {
                            Ok(ChatSummary {
                                id: row.get(0)?,
                                title: row.get(1)?,
                                last_preview: row.get(2)?,
                                created_at: row.get(3)?,
                                updated_at: row.get(4)?,
                                message_count: row.get(5)?,
                            })
                        })
                        .optional()?;
                    Ok(row)
                })
                .await?;
            Ok(row)
        })
    }

    fn record_activity(
        &self,
        chat_id: &ChatId,
        preview: &str,
        now_ms: i64,
    ) -> StoreFuture<'_, StoreResult<()>> {
        let id = chat_id.to_string();
        let preview = preview.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table}
                                 (id, title, last_preview, created_at, updated_at, message_count)
                             VALUES (?1, '', ?2, ?3, ?3, 1)
                             ON CONFLICT(id) DO UPDATE SET
                                 last_preview = excluded.last_preview,
                                 updated_at = excluded.updated_at,
                                 message_count = {table}.message_count + 1"
                        ),
                        rusqlite::params![id, preview, now_ms],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }

    fn set_title(&self, chat_id: &ChatId, title: &str) -> StoreFuture<'_, StoreResult<()>> {
        let id = chat_id.to_string();
        let title = title.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!("UPDATE {table} SET title = ?1 WHERE id = ?2"),
                        rusqlite::params![title, id],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }

    fn archive(&self, chat_id: &ChatId) -> StoreFuture<'_, StoreResult<()>> {
        let id = chat_id.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!("UPDATE {table} SET is_archived = 1 WHERE id = ?1"),
                        rusqlite::params![id],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn directory() -> SqliteChatDirectory {
        let conn = Arc::new(Connection::open_in_memory().await.expect("open"));
        SqliteChatDirectory::new(conn).await.expect("init")
    }

    #[tokio::test]
    async fn record_activity_creates_then_increments() {
        let dir = directory().await;
        let chat = ChatId::new("street-group");
        dir.record_activity(&chat, "first reply", 1_000)
            .await
            .expect("record");
        dir.record_activity(&chat, "second reply", 2_000)
            .await
            .expect("record");

        let summary = dir
            .get_by_id(&chat)
            .await
            .expect("get")
            .expect("chat exists");
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.last_preview, "second reply");
        assert_eq!(summary.created_at, 1_000);
        assert_eq!(summary.updated_at, 2_000);
    }

    #[tokio::test]
    async fn listing_orders_by_recent_activity() {
        let dir = directory().await;
        dir.record_activity(&ChatId::new("old"), "x", 1_000)
            .await
            .expect("record");
        dir.record_activity(&ChatId::new("new"), "y", 5_000)
            .await
            .expect("record");

        let listed = dir.list_recent().await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "new");
        assert_eq!(listed[1].id, "old");
    }

    #[tokio::test]
    async fn archived_chats_are_hidden() {
        let dir = directory().await;
        let chat = ChatId::new("done");
        dir.record_activity(&chat, "bye", 1_000)
            .await
            .expect("record");
        dir.archive(&chat).await.expect("archive");

        assert!(dir.get_by_id(&chat).await.expect("get").is_none());
        assert!(dir.list_recent().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn titles_can_be_set() {
        let dir = directory().await;
        let chat = ChatId::new("named");
        dir.record_activity(&chat, "hi", 1_000)
            .await
            .expect("record");
        dir.set_title(&chat, "Apartment 3B").await.expect("title");

        let summary = dir
            .get_by_id(&chat)
            .await
            .expect("get")
            .expect("chat exists");
        assert_eq!(summary.title, "Apartment 3B");
    }
}
