//! Integration tests for `EncryptionKeyManager`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sealed_journal::{
    EncryptionKeyManager, JournalError, KeyStore, KeyStoreError, MemoryKeyStore,
};

// ============================================================================
// Helpers
// ============================================================================

/// Memory-backed store that logs every `set` and answers `get` slowly, so
/// concurrent callers overlap.
struct RecordingKeyStore {
    inner: MemoryKeyStore,
    sets: Arc<Mutex<Vec<(String, String)>>>,
    delay: Duration,
}

impl RecordingKeyStore {
    fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryKeyStore::new(),
            sets: Arc::new(Mutex::new(Vec::new())),
            delay,
        }
    }

    fn set_calls(&self) -> Vec<(String, String)> {
        self.sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyStore for RecordingKeyStore {
    async fn get(&self, name: &str) -> Result<Option<String>, KeyStoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(name).await
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), KeyStoreError> {
        self.sets
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        self.inner.set(name, value).await
    }
}

/// Store whose reads or writes fail on demand.
struct FailingKeyStore {
    inner: MemoryKeyStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingKeyStore {
    fn new(fail_reads: bool, fail_writes: bool) -> Self {
        Self {
            inner: MemoryKeyStore::new(),
            fail_reads: AtomicBool::new(fail_reads),
            fail_writes: AtomicBool::new(fail_writes),
        }
    }
}

#[async_trait]
impl KeyStore for FailingKeyStore {
    async fn get(&self, name: &str) -> Result<Option<String>, KeyStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KeyStoreError::read(name, "keychain locked"));
        }
        self.inner.get(name).await
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), KeyStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeyStoreError::write(name, "disk full"));
        }
        self.inner.set(name, value).await
    }
}

// ============================================================================
// get_or_create_key
// ============================================================================

#[tokio::test]
async fn first_call_generates_and_stores_once() {
    let store = Arc::new(RecordingKeyStore::new(Duration::ZERO));
    let manager = EncryptionKeyManager::new(store.clone());

    let first = manager.get_or_create_key().await.unwrap();
    let calls = store.set_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "encryption_key");
    assert_eq!(calls[0].1, first.expose_secret());

    let second = manager.get_or_create_key().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.set_calls().len(), 1);
}

#[tokio::test]
async fn a_later_session_reuses_the_stored_key() {
    let store = Arc::new(RecordingKeyStore::new(Duration::ZERO));
    let first = EncryptionKeyManager::new(store.clone())
        .get_or_create_key()
        .await
        .unwrap();

    let again = EncryptionKeyManager::new(store.clone())
        .get_or_create_key()
        .await
        .unwrap();
    assert_eq!(first, again);
    assert_eq!(store.set_calls().len(), 1);
}

#[tokio::test]
async fn generated_key_is_printable_256_bit_base64url() {
    let manager = EncryptionKeyManager::new(Arc::new(MemoryKeyStore::new()));
    let key = manager.get_or_create_key().await.unwrap();
    let secret = key.expose_secret();
    assert_eq!(secret.len(), 43);
    assert!(secret
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_generation() {
    let store = Arc::new(RecordingKeyStore::new(Duration::from_millis(20)));
    let manager = Arc::new(EncryptionKeyManager::new(store.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.get_or_create_key().await })
        })
        .collect();

    let mut keys = Vec::new();
    for handle in handles {
        keys.push(handle.await.unwrap().unwrap());
    }
    assert!(keys.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(store.set_calls().len(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn read_failure_surfaces_as_read_error() {
    let manager = EncryptionKeyManager::new(Arc::new(FailingKeyStore::new(true, false)));
    let err = manager.get_or_create_key().await.unwrap_err();
    assert!(matches!(
        err,
        JournalError::KeyStore(KeyStoreError::Read { ref name, .. }) if name == "encryption_key"
    ));
}

#[tokio::test]
async fn write_failure_is_not_cached() {
    let store = Arc::new(FailingKeyStore::new(false, true));
    let manager = EncryptionKeyManager::new(store.clone());

    let err = manager.get_or_create_key().await.unwrap_err();
    assert!(matches!(err, JournalError::KeyStore(KeyStoreError::Write { .. })));
    assert!(manager.cached_key().is_none());

    store.fail_writes.store(false, Ordering::SeqCst);
    let key = manager.get_or_create_key().await.unwrap();
    assert_eq!(
        store.inner.get("encryption_key").await.unwrap().as_deref(),
        Some(key.expose_secret())
    );
}
