//! Integration tests for `StreamProjector` over `MemoryEntryStore`.

use chrono::{DateTime, TimeZone, Utc};
use sealed_journal::{
    encrypt, EncryptionKey, EntryStore, MemoryEntryStore, MoodKey, NewRecord, PlaintextEntry,
    ProjectorOptions, StreamProjector,
};
use serde_json::{json, Map, Value};

// ============================================================================
// Helpers
// ============================================================================

fn key(secret: &str) -> EncryptionKey {
    EncryptionKey::new(secret).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200 + secs, 0).unwrap()
}

fn entry(text: &str) -> PlaintextEntry {
    PlaintextEntry::new(text, MoodKey::Content, "2024-01-01T00:00:00Z")
}

async fn add(store: &MemoryEntryStore, user: &str, secret: &str, text: &str, secs: i64) -> String {
    let ciphertext = encrypt(&entry(text), secret).unwrap();
    store
        .add(NewRecord::private(user, ciphertext, at(secs)))
        .await
        .unwrap()
}

fn raw_document(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn texts(projector: &StreamProjector) -> Vec<String> {
    projector
        .current()
        .entries
        .iter()
        .map(|v| v.entry.text.clone())
        .collect()
}

// ============================================================================
// Snapshots
// ============================================================================

#[tokio::test]
async fn foreign_key_records_are_dropped_from_the_snapshot() {
    let store = MemoryEntryStore::new();
    add(&store, "u1", "K1", "one", 1).await;
    add(&store, "u1", "K2", "foreign a", 2).await;
    add(&store, "u1", "K1", "two", 3).await;
    add(&store, "u1", "K2", "foreign b", 4).await;
    add(&store, "u1", "K1", "three", 5).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    let state = projector.current();
    assert_eq!(state.entries.len(), 3);
    assert_eq!(state.dropped, 2);
    assert_eq!(texts(&projector), ["three", "two", "one"]);
}

#[tokio::test]
async fn other_users_records_never_appear() {
    let store = MemoryEntryStore::new();
    add(&store, "u1", "K1", "mine", 1).await;
    add(&store, "u2", "K1", "theirs", 2).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    assert_eq!(texts(&projector), ["mine"]);
}

#[tokio::test]
async fn each_write_republishes_the_full_list() {
    let store = MemoryEntryStore::new();
    let first = add(&store, "u1", "K1", "first", 1).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    let mut rx = projector.subscribe();
    let _ = rx.borrow_and_update();

    add(&store, "u1", "K1", "second", 2).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().entries.len(), 2);

    store.delete(&first).await.unwrap();
    assert_eq!(texts(&projector), ["second"]);
}

#[tokio::test]
async fn metadata_is_merged_onto_the_plaintext() {
    let store = MemoryEntryStore::new();
    let id = add(&store, "u1", "K1", "hello", 7).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    let state = projector.current();
    let view = &state.entries[0];
    assert_eq!(view.id, id);
    assert_eq!(view.created_at, at(7));
    assert!(!view.is_shared);
    assert_eq!(view.entry, entry("hello"));
}

#[tokio::test]
async fn legacy_field_name_is_read_and_missing_content_is_dropped() {
    let store = MemoryEntryStore::new();
    let ciphertext = encrypt(&entry("from an old client"), "K1").unwrap();
    store.insert_document(
        "legacy",
        raw_document(json!({
            "userId": "u1",
            "cryptedContent": ciphertext,
            "createdAt": "2023-06-01T00:00:00Z"
        })),
    );
    store.insert_document(
        "hollow",
        raw_document(json!({
            "userId": "u1",
            "createdAt": "2023-06-02T00:00:00Z"
        })),
    );

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    let state = projector.current();
    assert_eq!(state.dropped, 1);
    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[0].id, "legacy");
}

#[tokio::test]
async fn tampered_ciphertext_is_dropped() {
    let store = MemoryEntryStore::new();
    let mut ciphertext = encrypt(&entry("original"), "K1").unwrap();
    let last = ciphertext.pop().unwrap();
    ciphertext.push(if last == 'A' { 'B' } else { 'A' });
    store
        .add(NewRecord::private("u1", ciphertext, at(1)))
        .await
        .unwrap();
    add(&store, "u1", "K1", "intact", 2).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    assert_eq!(texts(&projector), ["intact"]);
    assert_eq!(projector.current().dropped, 1);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn listener_failure_stops_loading_with_the_error() {
    let store = MemoryEntryStore::new();
    add(&store, "u1", "K1", "kept", 1).await;

    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    store.fail_subscriptions("permission-denied");

    let state = projector.current();
    assert!(!state.loading);
    assert_eq!(
        state.error.as_ref().map(|e| e.message.as_str()),
        Some("permission-denied")
    );
    assert_eq!(state.entries.len(), 1);

    add(&store, "u1", "K1", "after failure", 2).await;
    assert_eq!(projector.current().entries.len(), 1);
}

#[tokio::test]
async fn dropping_the_projector_unsubscribes() {
    let store = MemoryEntryStore::new();
    let projector =
        StreamProjector::start(&store, "u1", &key("K1"), ProjectorOptions::default()).unwrap();
    let rx = projector.subscribe();
    assert_eq!(store.listener_count(), 1);

    drop(projector);
    assert_eq!(store.listener_count(), 0);
    assert!(rx.has_changed().is_err());
}
