//! Persistent conversation storage.
//!
//! Two layers: a flat key-value collaborator holding per-chat message lists
//! ([`kv`], [`chat_log`]), and a chat directory with list-screen metadata
//! ([`directory`]).

/// Append-only per-chat message log over key-value storage.
pub mod chat_log;
/// SQLite-backed chat directory for the list screen.
pub mod directory;
/// Key-value persistence collaborator.
pub mod kv;

pub use chat_log::ChatLog;
pub use directory::{ChatDirectory, ChatSummary, SqliteChatDirectory};
pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StoreFuture};
