//! Record store behavior against a real storage file.

use std::sync::Arc;

use horizondesk_store::{
    DecodePolicy, FileStorage, KeyValueStorage, NewChatMessage, NewSnippet, RecordStore,
    StoreError, StoreOptions, COMMAND_HISTORY, SNIPPETS,
};
use tempfile::TempDir;

fn open(dir: &TempDir, decode: DecodePolicy) -> (RecordStore, Arc<FileStorage>) {
    let storage = Arc::new(FileStorage::open_dir(dir.path()).unwrap());
    let options = StoreOptions {
        decode,
        ..Default::default()
    };
    (RecordStore::with_options(storage.clone(), options), storage)
}

#[test]
fn test_history_retention_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let (store, _) = open(&dir, DecodePolicy::Lenient);
        for i in 0..40 {
            store.add_command_history(format!("cmd {i}"), vec![]).unwrap();
        }
    }

    let (store, _) = open(&dir, DecodePolicy::Lenient);
    for i in 40..60 {
        store.add_command_history(format!("cmd {i}"), vec![]).unwrap();
    }

    let history = store.list(COMMAND_HISTORY).unwrap();
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].command, "cmd 10");
    assert_eq!(history[49].command, "cmd 59");
}

#[test]
fn test_corrupt_collection_is_isolated() {
    let dir = TempDir::new().unwrap();
    let (store, storage) = open(&dir, DecodePolicy::Lenient);
    store
        .save_console_message(NewChatMessage::user("still here"))
        .unwrap();
    storage.set("horizondesk_snippets", "[{broken").unwrap();

    assert!(store.list(SNIPPETS).unwrap().is_empty());
    assert_eq!(store.console_messages().unwrap().len(), 1);

    // Writing to the corrupt collection starts it afresh.
    store
        .add(
            SNIPPETS,
            NewSnippet {
                name: "ok".into(),
                code: "1".into(),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.list(SNIPPETS).unwrap().len(), 1);
}

#[test]
fn test_strict_policy_reports_corruption() {
    let dir = TempDir::new().unwrap();
    let (store, storage) = open(&dir, DecodePolicy::Strict);
    storage.set("horizondesk_snippets", "not json").unwrap();

    assert!(matches!(
        store.list(SNIPPETS),
        Err(StoreError::Decoding { .. })
    ));
}

#[test]
fn test_corrupt_storage_file_is_set_aside() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("storage.json");
    std::fs::write(&file, "{garbage").unwrap();

    let (store, storage) = open(&dir, DecodePolicy::Lenient);
    assert!(store.list(SNIPPETS).unwrap().is_empty());
    assert!(storage.quarantine_path().exists());

    store.add_command_history("ls", vec![]).unwrap();
    assert_eq!(store.command_history().unwrap().len(), 1);
    assert_eq!(
        std::fs::read_to_string(storage.quarantine_path()).unwrap(),
        "{garbage"
    );
}

#[test]
fn test_bad_record_survives_rewrite_on_disk() {
    let dir = TempDir::new().unwrap();
    let (store, storage) = open(&dir, DecodePolicy::Lenient);
    let good = store.add_command_history("pwd", vec![]).unwrap();

    let mut values: Vec<serde_json::Value> =
        serde_json::from_str(&storage.get("horizondesk_command_history").unwrap().unwrap())
            .unwrap();
    values.insert(0, serde_json::json!({ "id": "legacy", "command": "keep me" }));
    storage
        .set(
            "horizondesk_command_history",
            &serde_json::to_string(&values).unwrap(),
        )
        .unwrap();

    let history = store.command_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, good.id);

    store.add_command_history("whoami", vec![]).unwrap();
    let raw = storage.get("horizondesk_command_history").unwrap().unwrap();
    assert!(raw.contains("keep me"));
    assert_eq!(store.command_history().unwrap().len(), 2);
}

#[test]
fn test_clear_all_empties_file() {
    let dir = TempDir::new().unwrap();
    let (store, storage) = open(&dir, DecodePolicy::Lenient);
    store.add_command_history("ls", vec!["a".into()]).unwrap();
    store
        .save_widget_message(NewChatMessage::assistant("hi"))
        .unwrap();

    store.clear_all().unwrap();
    assert!(storage.get("horizondesk_command_history").unwrap().is_none());
    assert!(store.widget_messages().unwrap().is_empty());
}
