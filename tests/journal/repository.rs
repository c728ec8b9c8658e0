//! Integration tests for the write path and sharing.

use std::sync::Arc;

use sealed_journal::{
    EncryptionKeyManager, EntryRepository, JournalOptions, MemoryEntryStore, MemoryKeyStore,
    MoodKey, PlaintextEntry, ProjectorOptions, SharedFeed, StreamProjector,
};

const SHARED_FIELDS: [&str; 3] = ["sharedText", "sharedMood", "sharedDate"];

fn entry(text: &str, mood: MoodKey) -> PlaintextEntry {
    PlaintextEntry::new(text, mood, "2024-04-04T10:00:00Z")
}

#[tokio::test]
async fn unsharing_deletes_mirror_fields() {
    let store = MemoryEntryStore::new();
    let manager = EncryptionKeyManager::new(Arc::new(MemoryKeyStore::new()));
    let key = manager.get_or_create_key().await.unwrap();
    let repo = EntryRepository::new(Arc::new(store.clone()), "u1", &key).unwrap();

    let note = entry("talk about sleep", MoodKey::Tired);
    let id = repo.create(&note).await.unwrap();

    repo.set_shared(&id, true).await.unwrap();
    let doc = store.document(&id).unwrap();
    assert_eq!(doc["isShared"], true);
    assert_eq!(doc["sharedText"], "talk about sleep");
    assert_eq!(doc["sharedMood"], "tired");
    assert_eq!(doc["sharedDate"], "2024-04-04T10:00:00Z");

    repo.set_shared(&id, false).await.unwrap();
    let doc = store.document(&id).unwrap();
    assert_eq!(doc["isShared"], false);
    for field in SHARED_FIELDS {
        assert!(!doc.contains_key(field), "{field} should be absent");
    }
    assert_eq!(repo.read(&id).await.unwrap(), note);
}

#[tokio::test]
async fn a_session_writes_what_its_projector_reads() {
    let options = JournalOptions::from_json(r#"{ "collection": "journal_entries_v2" }"#).unwrap();
    let store = Arc::new(MemoryEntryStore::from_options(&options));
    assert_eq!(store.collection(), "journal_entries_v2");
    let manager = EncryptionKeyManager::from_options(
        Arc::new(MemoryKeyStore::new()),
        &options,
        "u1",
    );
    let key = manager.get_or_create_key().await.unwrap();

    let projector = StreamProjector::start(
        &*store,
        "u1",
        &key,
        ProjectorOptions::from_journal(&options),
    )
    .unwrap();
    assert!(projector.current().entries.is_empty());

    let repo = EntryRepository::new(store.clone(), "u1", &key).unwrap();
    let id = repo.create(&entry("morning pages", MoodKey::Hopeful)).await.unwrap();
    repo.update(&id, &entry("morning pages, edited", MoodKey::Content))
        .await
        .unwrap();

    let state = projector.current();
    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[0].entry.text, "morning pages, edited");
    assert_eq!(state.entries[0].entry.mood, MoodKey::Content);
}

#[tokio::test]
async fn counterparty_sees_only_shared_plaintext() {
    let store = Arc::new(MemoryEntryStore::new());
    let manager = EncryptionKeyManager::new(Arc::new(MemoryKeyStore::new()));
    let key = manager.get_or_create_key().await.unwrap();
    let repo = EntryRepository::new(store.clone(), "patient", &key).unwrap();

    let open = entry("ready to talk", MoodKey::Hopeful);
    let open_id = repo.create(&open).await.unwrap();
    repo.create(&entry("just for me", MoodKey::Sad)).await.unwrap();
    repo.set_shared(&open_id, true).await.unwrap();

    let feed = SharedFeed::start(&*store, "patient");
    let state = feed.current();
    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[0].id, open_id);
    assert_eq!(state.entries[0].text, "ready to talk");

    repo.update(&open_id, &entry("ready to talk, and scared", MoodKey::Anxious))
        .await
        .unwrap();
    let state = feed.current();
    assert_eq!(state.entries[0].text, "ready to talk, and scared");
    assert_eq!(state.entries[0].mood, MoodKey::Anxious);

    repo.delete(&open_id).await.unwrap();
    assert!(feed.current().entries.is_empty());
}
