//! Collection names, storage keys, and typed collection handles.

use std::fmt;
use std::marker::PhantomData;

use crate::models::{ChatMessage, CommandHistoryEntry, Secret, Snippet};

/// One of the independently keyed groups of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Transcript of the assistant console.
    AiMessages,
    /// Transcript of the floating assistant widget.
    NovaMessages,
    /// Code snippet library.
    Snippets,
    /// Encrypted secrets.
    Secrets,
    /// Simulated terminal history, capped.
    CommandHistory,
}

impl Collection {
    /// Every collection, in the order they are wiped.
    pub const ALL: [Collection; 5] = [
        Collection::AiMessages,
        Collection::Snippets,
        Collection::Secrets,
        Collection::CommandHistory,
        Collection::NovaMessages,
    ];

    /// Collection name as used in storage keys.
    pub fn name(self) -> &'static str {
        match self {
            Collection::AiMessages => "ai_messages",
            Collection::NovaMessages => "nova_messages",
            Collection::Snippets => "snippets",
            Collection::Secrets => "secrets",
            Collection::CommandHistory => "command_history",
        }
    }

    /// Storage key under the given prefix, e.g. `horizondesk_snippets`.
    pub fn storage_key(self, prefix: &str) -> String {
        format!("{prefix}{}", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A collection bound to the record type stored in it.
///
/// Handles can only be obtained from the constants below, so a collection is
/// always read and written with its own record type.
pub struct Table<R> {
    collection: Collection,
    _record: PhantomData<fn() -> R>,
}

impl<R> Table<R> {
    const fn new(collection: Collection) -> Self {
        Self {
            collection,
            _record: PhantomData,
        }
    }

    /// The untyped collection behind this handle.
    pub fn collection(&self) -> Collection {
        self.collection
    }
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Table<R> {}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Table").field(&self.collection).finish()
    }
}

/// Assistant console transcript.
pub const AI_MESSAGES: Table<ChatMessage> = Table::new(Collection::AiMessages);

/// Assistant widget transcript.
pub const NOVA_MESSAGES: Table<ChatMessage> = Table::new(Collection::NovaMessages);

/// Snippet library.
pub const SNIPPETS: Table<Snippet> = Table::new(Collection::Snippets);

/// Secret vault entries (values are ciphertext tokens).
pub const SECRETS: Table<Secret> = Table::new(Collection::Secrets);

/// Command history, capped at the configured history limit.
pub const COMMAND_HISTORY: Table<CommandHistoryEntry> = Table::new(Collection::CommandHistory);
