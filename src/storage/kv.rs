//! Key-value persistence collaborator.
//!
//! The contract is deliberately small: `read` returns `None` for a missing
//! key (never an error), `write` replaces the previous value. Keys are
//! derived from sanitized chat ids by the layers above.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use rusqlite::OptionalExtension;
use thiserror::Error;
use tokio_rusqlite::Connection;

/// Boxed future type for store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying `SQLite` failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    /// Stored payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StorageError>;

/// Flat key-value storage collaborator.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> StoreFuture<'_, StoreResult<Option<String>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StoreFuture<'_, StoreResult<()>>;
}

/// `SQLite` implementation of the key-value store.
pub struct SqliteKeyValueStore {
    conn: Arc<Connection>,
    table: String,
}

impl SqliteKeyValueStore {
    /// Table name for key-value entries.
    pub const DEFAULT_TABLE: &'static str = "kv_entries";

    /// Initialize the store and create the table if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if database operations fail.
    pub async fn new(conn: Arc<Connection>) -> StoreResult<Self> {
        let table = Self::DEFAULT_TABLE.to_string();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn read(&self, key: &str) -> StoreFuture<'_, StoreResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let value = self
                .conn
                .call(move |conn| {
                    let mut stmt =
                        conn.prepare(&format!("SELECT value FROM {table} WHERE key = ?1"))?;
                    let row = stmt
                        .query_row([&key], |row| row.get::<_, String>(0))
                        .optional()?;
                    Ok(row)
                })
                .await?;
            Ok(value)
        })
    }

    fn write(&self, key: &str, value: &str) -> StoreFuture<'_, StoreResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let now_ms = chrono::Utc::now().timestamp_millis();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table} (key, value, updated_at)
                             VALUES (?1, ?2, ?3)
                             ON CONFLICT(key) DO UPDATE SET
                                 value = excluded.value,
                                 updated_at = excluded.updated_at"
                        ),
                        rusqlite::params![key, value, now_ms],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> StoreFuture<'_, StoreResult<Option<String>>> {
        let value = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("poisoned lock".to_string()))
            .map(|entries| entries.get(key).cloned());
        Box::pin(async move { value })
    }

    fn write(&self, key: &str, value: &str) -> StoreFuture<'_, StoreResult<()>> {
        let result = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("poisoned lock".to_string()))
            .map(|mut entries| {
                entries.insert(key.to_string(), value.to_string());
            });
        Box::pin(async move { result })
    }
}
