//! Record types persisted in the store.
//!
//! Records serialize with camelCase field names and RFC 3339 timestamps.
//! Optional fields default when absent so records written by older builds
//! still decode.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// A record type stored in one of the collections.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Caller-supplied fields; id and creation time are assigned by the store.
    type Draft;

    /// Unique identifier, assigned once at creation.
    fn id(&self) -> &str;

    /// Creation instant.
    fn created_at(&self) -> DateTime<Utc>;

    /// Reject drafts missing required fields.
    fn validate(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }

    /// Build the record from a validated draft.
    fn create(id: String, now: DateTime<Utc>, draft: Self::Draft) -> Self;
}

/// A record type supporting field-wise updates.
pub trait Patchable: Record {
    /// Set of optional replacement fields.
    type Patch;

    /// Replace every field present in `patch`, leaving the rest untouched.
    fn apply(&mut self, patch: Self::Patch);
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Chat transcripts
// ---------------------------------------------------------------------------

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "ai", alias = "nova")]
    Assistant,
}

/// A quick action offered alongside an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub label: String,
    pub command: String,
}

/// One turn of a chat transcript. Both assistant flavors share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,

    /// Set when `content` is source code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_code: Option<bool>,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<SuggestedAction>>,
}

/// Fields for a new chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChatMessage {
    pub sender: Sender,
    pub content: String,
    pub is_code: Option<bool>,
    pub actions: Option<Vec<SuggestedAction>>,
}

impl NewChatMessage {
    /// A plain message from the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            is_code: None,
            actions: None,
        }
    }

    /// A plain reply from the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            ..Self::user(content)
        }
    }

    /// Mark the content as source code.
    pub fn code(mut self) -> Self {
        self.is_code = Some(true);
        self
    }

    /// Attach suggested actions.
    pub fn with_actions(mut self, actions: Vec<SuggestedAction>) -> Self {
        self.actions = Some(actions);
        self
    }
}

impl Record for ChatMessage {
    type Draft = NewChatMessage;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn create(id: String, now: DateTime<Utc>, draft: NewChatMessage) -> Self {
        Self {
            id,
            sender: draft.sender,
            content: draft.content,
            is_code: draft.is_code,
            timestamp: now,
            actions: draft.actions,
        }
    }
}

// ---------------------------------------------------------------------------
// Snippets
// ---------------------------------------------------------------------------

/// A saved code snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
    /// Free-form language tag, e.g. `React` or `Docker`.
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new snippet. `name` and `code` are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSnippet {
    pub name: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
}

/// Replacement fields for a snippet update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Record for Snippet {
    type Draft = NewSnippet;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &NewSnippet) -> Result<()> {
        require_non_empty("snippet name", &draft.name)?;
        require_non_empty("snippet code", &draft.code)
    }

    fn create(id: String, now: DateTime<Utc>, draft: NewSnippet) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            code: draft.code,
            language: draft.language,
            tags: draft.tags,
            created_at: now,
        }
    }
}

impl Patchable for Snippet {
    type Patch = SnippetPatch;

    fn apply(&mut self, patch: SnippetPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// Split a comma-separated tag list, trimming and dropping empty entries.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// A vault entry. `value` is always a ciphertext token, never plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base64 token produced by the vault cipher.
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new secret. `value` must already be encrypted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSecret {
    pub name: String,
    pub description: String,
    pub value: String,
}

/// Replacement fields for a secret update. A replacement `value` must
/// already be encrypted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
}

impl Record for Secret {
    type Draft = NewSecret;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(draft: &NewSecret) -> Result<()> {
        require_non_empty("secret name", &draft.name)?;
        require_non_empty("secret value", &draft.value)
    }

    fn create(id: String, now: DateTime<Utc>, draft: NewSecret) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            value: draft.value,
            created_at: now,
        }
    }
}

impl Patchable for Secret {
    type Patch = SecretPatch;

    fn apply(&mut self, patch: SecretPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

// ---------------------------------------------------------------------------
// Command history
// ---------------------------------------------------------------------------

/// One simulated terminal invocation and its output lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandHistoryEntry {
    pub id: String,
    pub command: String,
    #[serde(default)]
    pub output: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Fields for a new history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCommand {
    pub command: String,
    pub output: Vec<String>,
}

impl Record for CommandHistoryEntry {
    type Draft = NewCommand;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn create(id: String, now: DateTime<Utc>, draft: NewCommand) -> Self {
        Self {
            id,
            command: draft.command,
            output: draft.output,
            timestamp: now,
        }
    }
}
