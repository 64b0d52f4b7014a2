//! Durable record collections for HorizonDesk.
//!
//! This crate provides:
//! - Key-value storage backends (in-memory and JSON file)
//! - Typed CRUD over the five record collections, with command-history retention
//! - Persisted application settings
//! - Snippet search

pub mod collection;
pub mod error;
pub mod kv;
pub mod models;
pub mod search;
pub mod settings;
pub mod store;

pub use collection::{
    Collection, Table, AI_MESSAGES, COMMAND_HISTORY, NOVA_MESSAGES, SECRETS, SNIPPETS,
};
pub use error::StoreError;
pub use kv::{FileStorage, KeyValueStorage, MemoryStorage};
pub use models::{
    parse_tags, ChatMessage, CommandHistoryEntry, NewChatMessage, NewCommand, NewSecret,
    NewSnippet, Patchable, Record, Secret, SecretPatch, Sender, Snippet, SnippetPatch,
    SuggestedAction,
};
pub use search::{category_count, filter_snippets};
pub use settings::{AppSettings, SettingsStore, Theme};
pub use store::{DecodePolicy, RecordStore, StoreOptions};

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
