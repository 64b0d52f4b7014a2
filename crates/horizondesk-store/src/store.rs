//! Typed CRUD over the key-value storage.
//!
//! Each collection lives under one key as a JSON array in insertion order.
//! Every mutation reads the whole array, modifies it, and writes it back;
//! the collections are small enough that this is the simplest correct scheme.
//! Nothing coordinates separate store handles on the same storage, so
//! interleaved writers lose updates (last writer wins).

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use horizondesk_core::config::{StorageConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_KEY_PREFIX};
use tracing::{debug, warn};

use crate::collection::{Collection, Table, AI_MESSAGES, COMMAND_HISTORY, NOVA_MESSAGES};
use crate::kv::{KeyValueStorage, MemoryStorage};
use crate::models::{ChatMessage, CommandHistoryEntry, NewChatMessage, NewCommand, Patchable, Record};
use crate::{Result, StoreError};

/// How `list` treats a collection whose stored value does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Log a warning and read the collection as empty.
    #[default]
    Lenient,
    /// Return [`StoreError::Decoding`].
    Strict,
}

/// Tunables for a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Prefix prepended to collection names to form storage keys.
    pub key_prefix: String,
    /// Treatment of undecodable collections.
    pub decode: DecodePolicy,
    /// Command-history retention cap.
    pub history_limit: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            decode: DecodePolicy::Lenient,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<&StorageConfig> for StoreOptions {
    fn from(config: &StorageConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            decode: if config.strict_decoding {
                DecodePolicy::Strict
            } else {
                DecodePolicy::Lenient
            },
            history_limit: config.history_limit,
        }
    }
}

/// Durable record collections over a [`KeyValueStorage`].
#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn KeyValueStorage>,
    options: StoreOptions,
}

impl RecordStore {
    /// Create a store with default options.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_options(storage, StoreOptions::default())
    }

    /// Create a store with explicit options.
    pub fn with_options(storage: Arc<dyn KeyValueStorage>, options: StoreOptions) -> Self {
        Self { storage, options }
    }

    /// Create a store over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Options in effect.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Underlying storage, shared with other consumers of the namespace.
    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    /// Storage key of a collection.
    pub fn key_for(&self, collection: Collection) -> String {
        collection.storage_key(&self.options.key_prefix)
    }

    /// All records of a collection, oldest first.
    ///
    /// An absent collection is empty. Under [`DecodePolicy::Lenient`] a value
    /// that is not a JSON array reads as empty, and array elements that do not
    /// decode are skipped (but kept in storage, see [`Slot`]). Under
    /// [`DecodePolicy::Strict`] either case is an error.
    pub fn list<R: Record>(&self, table: Table<R>) -> Result<Vec<R>> {
        Ok(self
            .load(table)?
            .into_iter()
            .filter_map(Slot::into_record)
            .collect())
    }

    /// Look up one record by id.
    pub fn get<R: Record>(&self, table: Table<R>, id: &str) -> Result<R> {
        self.list(table)?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Append a new record built from `draft`, returning it.
    ///
    /// The record gets a fresh random id and a creation time that never
    /// precedes the newest record already in the collection.
    pub fn add<R: Record>(&self, table: Table<R>, draft: R::Draft) -> Result<R> {
        self.append(table, draft, None)
    }

    /// Replace the fields present in `patch` on the record with `id`.
    ///
    /// Returns `false`, without writing, when no record has that id.
    pub fn update<R: Patchable>(&self, table: Table<R>, id: &str, patch: R::Patch) -> Result<bool> {
        let mut slots = self.load(table)?;
        let found = slots.iter_mut().find_map(|slot| match slot {
            Slot::Record(r) if r.id() == id => Some(r),
            _ => None,
        });
        let Some(record) = found else {
            debug!(collection = %table.collection(), id, "update skipped, no such record");
            return Ok(false);
        };

        record.apply(patch);
        self.write(table, &slots)?;
        Ok(true)
    }

    /// Remove the record with `id`.
    ///
    /// Returns `false`, without writing, when no record has that id.
    pub fn delete<R: Record>(&self, table: Table<R>, id: &str) -> Result<bool> {
        let mut slots = self.load(table)?;
        let before = slots.len();
        slots.retain(|slot| !matches!(slot, Slot::Record(r) if r.id() == id));
        if slots.len() == before {
            debug!(collection = %table.collection(), id, "delete skipped, no such record");
            return Ok(false);
        }

        self.write(table, &slots)?;
        Ok(true)
    }

    /// Record a simulated command, evicting the oldest entries beyond the
    /// history limit.
    pub fn add_command_history(
        &self,
        command: impl Into<String>,
        output: Vec<String>,
    ) -> Result<CommandHistoryEntry> {
        let draft = NewCommand {
            command: command.into(),
            output,
        };
        self.append(COMMAND_HISTORY, draft, Some(self.options.history_limit))
    }

    /// Command history, oldest first.
    pub fn command_history(&self) -> Result<Vec<CommandHistoryEntry>> {
        self.list(COMMAND_HISTORY)
    }

    /// Append a turn to the assistant console transcript.
    pub fn save_console_message(&self, message: NewChatMessage) -> Result<ChatMessage> {
        self.add(AI_MESSAGES, message)
    }

    /// Assistant console transcript, oldest first.
    pub fn console_messages(&self) -> Result<Vec<ChatMessage>> {
        self.list(AI_MESSAGES)
    }

    /// Append a turn to the assistant widget transcript.
    pub fn save_widget_message(&self, message: NewChatMessage) -> Result<ChatMessage> {
        self.add(NOVA_MESSAGES, message)
    }

    /// Assistant widget transcript, oldest first.
    pub fn widget_messages(&self) -> Result<Vec<ChatMessage>> {
        self.list(NOVA_MESSAGES)
    }

    /// Remove every collection. Irreversible.
    pub fn clear_all(&self) -> Result<()> {
        for collection in Collection::ALL {
            self.storage.remove(&self.key_for(collection))?;
        }
        debug!("cleared all collections");
        Ok(())
    }

    fn append<R: Record>(&self, table: Table<R>, draft: R::Draft, cap: Option<usize>) -> Result<R> {
        R::validate(&draft)?;

        let mut slots = self.load(table)?;
        let mut now = Utc::now();
        if let Some(newest) = slots.iter().rev().find_map(Slot::record) {
            now = now.max(newest.created_at());
        }

        let record = R::create(horizondesk_core::id::uuid(), now, draft);
        slots.push(Slot::Record(record.clone()));

        if let Some(cap) = cap {
            if slots.len() > cap {
                let evicted = slots.len() - cap;
                slots.drain(..evicted);
                debug!(collection = %table.collection(), evicted, "evicted oldest records");
            }
        }

        self.write(table, &slots)?;
        Ok(record)
    }

    /// Decode a collection element by element.
    fn load<R: Record>(&self, table: Table<R>) -> Result<Vec<Slot<R>>> {
        let collection = table.collection();
        let Some(raw) = self.storage.get(&self.key_for(collection))? else {
            return Ok(Vec::new());
        };

        let values = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values,
            Err(source) => {
                self.undecodable(collection, source)?;
                warn!(%collection, "discarding undecodable collection");
                return Ok(Vec::new());
            }
        };

        let mut slots = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match R::deserialize(&value) {
                Ok(record) => slots.push(Slot::Record(record)),
                Err(source) => {
                    self.undecodable(collection, source)?;
                    warn!(%collection, index, "skipping undecodable record");
                    slots.push(Slot::Raw(value));
                }
            }
        }
        Ok(slots)
    }

    /// Apply the decode policy to a decoding failure: `Ok` means carry on.
    fn undecodable(&self, collection: Collection, source: serde_json::Error) -> Result<()> {
        match self.options.decode {
            DecodePolicy::Lenient => {
                debug!(%collection, "decode failure tolerated: {source}");
                Ok(())
            }
            DecodePolicy::Strict => Err(StoreError::Decoding {
                collection: collection.name().to_string(),
                source,
            }),
        }
    }

    fn write<R: Record>(&self, table: Table<R>, slots: &[Slot<R>]) -> Result<()> {
        let collection = table.collection();
        let data = serde_json::to_string(slots)?;
        debug!(%collection, count = slots.len(), "writing collection");
        self.storage.set(&self.key_for(collection), &data)
    }
}

/// One stored array element.
///
/// Elements that fail to decode are carried through rewrites verbatim, so a
/// single malformed record never costs the rest of the collection.
#[derive(Serialize)]
#[serde(untagged)]
enum Slot<R> {
    Record(R),
    Raw(Value),
}

impl<R> Slot<R> {
    fn record(&self) -> Option<&R> {
        match self {
            Slot::Record(r) => Some(r),
            Slot::Raw(_) => None,
        }
    }

    fn into_record(self) -> Option<R> {
        match self {
            Slot::Record(r) => Some(r),
            Slot::Raw(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{SECRETS, SNIPPETS};
    use crate::models::{NewSecret, NewSnippet, Sender, SnippetPatch};

    fn snippet(name: &str) -> NewSnippet {
        NewSnippet {
            name: name.to_string(),
            description: "desc".to_string(),
            code: "console.log(1)".to_string(),
            language: "Node.js".to_string(),
            tags: vec!["node".to_string()],
        }
    }

    #[test]
    fn test_list_absent_collection_is_empty() {
        let store = RecordStore::in_memory();
        assert!(store.list(SNIPPETS).unwrap().is_empty());
        assert!(store.command_history().unwrap().is_empty());
    }

    #[test]
    fn test_add_then_list_round_trip() {
        let store = RecordStore::in_memory();
        let added = store.add(SNIPPETS, snippet("logger")).unwrap();

        let listed = store.list(SNIPPETS).unwrap();
        assert_eq!(listed, vec![added.clone()]);
        assert_eq!(added.name, "logger");
        assert_eq!(added.tags, vec!["node"]);
        assert_eq!(added.id.len(), 36);
    }

    #[test]
    fn test_list_preserves_insertion_order_and_timestamps() {
        let store = RecordStore::in_memory();
        for name in ["a", "b", "c"] {
            store.add(SNIPPETS, snippet(name)).unwrap();
        }
        let listed = store.list(SNIPPETS).unwrap();
        let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = RecordStore::in_memory();
        let a = store.add(SNIPPETS, snippet("a")).unwrap();
        let b = store.add(SNIPPETS, snippet("b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_rejects_invalid_draft_without_writing() {
        let store = RecordStore::in_memory();
        let result = store.add(SNIPPETS, NewSnippet::default());
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.storage().get("horizondesk_snippets").unwrap().is_none());
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let store = RecordStore::in_memory();
        let original = store.add(SNIPPETS, snippet("logger")).unwrap();

        let patch = SnippetPatch {
            description: Some("x".to_string()),
            ..Default::default()
        };
        assert!(store.update(SNIPPETS, &original.id, patch).unwrap());

        let updated = store.get(SNIPPETS, &original.id).unwrap();
        assert_eq!(updated.description, "x");
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.code, original.code);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let store = RecordStore::in_memory();
        store.add(SNIPPETS, snippet("logger")).unwrap();
        let before = store.list(SNIPPETS).unwrap();

        let changed = store
            .update(SNIPPETS, "missing", SnippetPatch::default())
            .unwrap();
        assert!(!changed);
        assert_eq!(store.list(SNIPPETS).unwrap(), before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = RecordStore::in_memory();
        let keep = store.add(SNIPPETS, snippet("keep")).unwrap();
        let gone = store.add(SNIPPETS, snippet("gone")).unwrap();

        assert!(store.delete(SNIPPETS, &gone.id).unwrap());
        let after_first = store.list(SNIPPETS).unwrap();
        assert!(!store.delete(SNIPPETS, &gone.id).unwrap());
        let after_second = store.list(SNIPPETS).unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second, vec![keep]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = RecordStore::in_memory();
        assert!(matches!(
            store.get(SNIPPETS, "nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_command_history_retention() {
        let store = RecordStore::in_memory();
        for i in 0..60 {
            store
                .add_command_history(format!("cmd {i}"), vec![format!("out {i}")])
                .unwrap();
        }

        let history = store.command_history().unwrap();
        assert_eq!(history.len(), 50);
        assert_eq!(history.first().unwrap().command, "cmd 10");
        assert_eq!(history.last().unwrap().command, "cmd 59");
        assert!(history.iter().all(|e| e.command != "cmd 9"));
    }

    #[test]
    fn test_custom_history_limit() {
        let options = StoreOptions {
            history_limit: 3,
            ..Default::default()
        };
        let store = RecordStore::with_options(Arc::new(MemoryStorage::new()), options);
        for cmd in ["ls", "pwd", "whoami", "date"] {
            store.add_command_history(cmd, Vec::new()).unwrap();
        }
        let commands: Vec<String> = store
            .command_history()
            .unwrap()
            .into_iter()
            .map(|e| e.command)
            .collect();
        assert_eq!(commands, vec!["pwd", "whoami", "date"]);
    }

    #[test]
    fn test_corrupt_collection_reads_empty_when_lenient() {
        let store = RecordStore::in_memory();
        store.add(SNIPPETS, snippet("a")).unwrap();
        store
            .storage()
            .set("horizondesk_snippets", "{not json")
            .unwrap();

        assert!(store.list(SNIPPETS).unwrap().is_empty());
    }

    #[test]
    fn test_add_after_corruption_discards_old_data() {
        let store = RecordStore::in_memory();
        store.storage().set("horizondesk_snippets", "garbage").unwrap();

        store.add(SNIPPETS, snippet("fresh")).unwrap();
        let listed = store.list(SNIPPETS).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "fresh");
    }

    #[test]
    fn test_corrupt_collection_errors_when_strict() {
        let options = StoreOptions {
            decode: DecodePolicy::Strict,
            ..Default::default()
        };
        let store = RecordStore::with_options(Arc::new(MemoryStorage::new()), options);
        store.storage().set("horizondesk_secrets", "[{").unwrap();

        match store.list(SECRETS) {
            Err(StoreError::Decoding { collection, .. }) => assert_eq!(collection, "secrets"),
            other => panic!("expected decoding error, got {other:?}"),
        }
    }

    fn one_good_one_bad(store: &RecordStore) {
        store.add(SNIPPETS, snippet("good")).unwrap();
        let mut values: Vec<Value> =
            serde_json::from_str(&store.storage().get("horizondesk_snippets").unwrap().unwrap())
                .unwrap();
        let mut bad = values[0].clone();
        bad["id"] = Value::String("bad-id".to_string());
        bad["name"] = Value::String("keep me".to_string());
        bad["createdAt"] = Value::Null;
        values.push(bad);
        store
            .storage()
            .set("horizondesk_snippets", &serde_json::to_string(&values).unwrap())
            .unwrap();
    }

    #[test]
    fn test_bad_element_is_skipped_not_lost() {
        let store = RecordStore::in_memory();
        one_good_one_bad(&store);

        let listed = store.list(SNIPPETS).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "good");

        store.add(SNIPPETS, snippet("newer")).unwrap();
        let raw = store.storage().get("horizondesk_snippets").unwrap().unwrap();
        assert!(raw.contains("keep me"));

        let names: Vec<_> = store.list(SNIPPETS).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["good", "newer"]);

        let good_id = store.list(SNIPPETS).unwrap()[0].id.clone();
        assert!(store.delete(SNIPPETS, &good_id).unwrap());
        assert!(!store.delete(SNIPPETS, "bad-id").unwrap());
        let raw = store.storage().get("horizondesk_snippets").unwrap().unwrap();
        assert!(raw.contains("keep me"));
    }

    #[test]
    fn test_bad_element_errors_when_strict() {
        let options = StoreOptions {
            decode: DecodePolicy::Strict,
            ..Default::default()
        };
        let store = RecordStore::with_options(Arc::new(MemoryStorage::new()), options);
        one_good_one_bad(&store);

        assert!(matches!(
            store.list(SNIPPETS),
            Err(StoreError::Decoding { .. })
        ));
        assert!(store.add(SNIPPETS, snippet("newer")).is_err());
        let raw = store.storage().get("horizondesk_snippets").unwrap().unwrap();
        assert!(raw.contains("keep me"));
    }

    #[test]
    fn test_dates_revive_from_stored_strings() {
        let store = RecordStore::in_memory();
        store
            .storage()
            .set(
                "horizondesk_command_history",
                r#"[{"id":"1","command":"ls","output":["a","b"],"timestamp":"2024-05-06T07:08:09.123Z"}]"#,
            )
            .unwrap();

        let history = store.command_history().unwrap();
        assert_eq!(
            history[0].timestamp.to_rfc3339(),
            "2024-05-06T07:08:09.123+00:00"
        );
    }

    #[test]
    fn test_chat_transcripts_are_independent() {
        let store = RecordStore::in_memory();
        store
            .save_console_message(NewChatMessage::user("how do I center a div?"))
            .unwrap();
        store
            .save_widget_message(NewChatMessage::assistant("Hi there"))
            .unwrap();

        let console = store.console_messages().unwrap();
        let widget = store.widget_messages().unwrap();
        assert_eq!(console.len(), 1);
        assert_eq!(console[0].sender, Sender::User);
        assert_eq!(widget.len(), 1);
        assert_eq!(widget[0].sender, Sender::Assistant);
    }

    #[test]
    fn test_clear_all_removes_every_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let store = RecordStore::new(storage.clone());
        store.add(SNIPPETS, snippet("a")).unwrap();
        store
            .add(
                SECRETS,
                NewSecret {
                    name: "DB_URL".into(),
                    description: String::new(),
                    value: "dG9rZW4=".into(),
                },
            )
            .unwrap();
        store.add_command_history("ls", vec![]).unwrap();
        store.save_console_message(NewChatMessage::user("hi")).unwrap();
        store.save_widget_message(NewChatMessage::user("hi")).unwrap();
        storage.set("horizondesk_settings", "{}").unwrap();

        store.clear_all().unwrap();
        assert_eq!(storage.len(), 1, "only unrelated keys survive");
        assert!(store.list(SNIPPETS).unwrap().is_empty());
    }

    #[test]
    fn test_key_prefix_option() {
        let storage = Arc::new(MemoryStorage::new());
        let options = StoreOptions {
            key_prefix: "test_".to_string(),
            ..Default::default()
        };
        let store = RecordStore::with_options(storage.clone(), options);
        store.add(SNIPPETS, snippet("a")).unwrap();
        assert!(storage.get("test_snippets").unwrap().is_some());
        assert!(storage.get("horizondesk_snippets").unwrap().is_none());
    }

    #[test]
    fn test_stale_writer_overwrites_interleaved_add() {
        // Two handles on one namespace do not coordinate: a writer holding a
        // stale copy of the collection drops records added in between.
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let tab_a = RecordStore::new(storage.clone());
        let tab_b = RecordStore::new(storage.clone());

        tab_a.add(SNIPPETS, snippet("first")).unwrap();
        let stale = storage.get("horizondesk_snippets").unwrap().unwrap();
        tab_b.add(SNIPPETS, snippet("from b")).unwrap();
        storage.set("horizondesk_snippets", &stale).unwrap();

        let names: Vec<String> = tab_b
            .list(SNIPPETS)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["first"]);
    }

    #[test]
    fn test_options_from_config() {
        let config = StorageConfig {
            strict_decoding: true,
            history_limit: 10,
            ..Default::default()
        };
        let options = StoreOptions::from(&config);
        assert_eq!(options.decode, DecodePolicy::Strict);
        assert_eq!(options.history_limit, 10);
        assert_eq!(options.key_prefix, "horizondesk_");
    }
}
