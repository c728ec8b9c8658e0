//! In-memory `EntryStore`. Holds raw JSON documents so partial updates and
//! field deletion behave the way a remote document store does, and pushes
//! full snapshots to live listeners after every write.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::{
    EntryStore, ErrorCallback, RecordQuery, SnapshotCallback, Unsubscribe,
};
use crate::entry::{CiphertextRecord, NewRecord, RecordPatch};
use crate::error::{StoreError, SubscriptionError};
use crate::options::{JournalOptions, DEFAULT_COLLECTION};

type Document = Map<String, Value>;

struct Listener {
    query: RecordQuery,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
}

#[derive(Default)]
struct State {
    documents: HashMap<String, Document>,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
}

impl State {
    fn snapshot(&self, collection: &str, query: &RecordQuery) -> Vec<CiphertextRecord> {
        let mut records: Vec<CiphertextRecord> = self
            .documents
            .iter()
            .filter_map(|(id, doc)| match CiphertextRecord::from_document(id, doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection, error = %e, "skipping unreadable document");
                    None
                }
            })
            .filter(|record| query.matches(record))
            .collect();
        query.sort(&mut records);
        records
    }
}

/// Document store kept entirely in memory.
///
/// Clones share the same documents and listeners. Snapshot delivery is
/// serialized: a listener never receives an older result set after a newer
/// one. Callbacks must not write to the store from the delivering thread.
#[derive(Clone)]
pub struct MemoryEntryStore {
    collection: String,
    state: Arc<Mutex<State>>,
    delivery: Arc<Mutex<()>>,
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::with_collection(DEFAULT_COLLECTION)
    }

    pub fn with_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            state: Arc::new(Mutex::new(State::default())),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Store named by `options.collection`.
    pub fn from_options(options: &JournalOptions) -> Self {
        Self::with_collection(options.collection.clone())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Raw stored document, exactly as written.
    pub fn document(&self, id: &str) -> Option<Document> {
        self.state.lock().documents.get(id).cloned()
    }

    /// Write a raw document under `id`, replacing any existing one, and
    /// notify listeners. Useful for seeding records written by other clients.
    pub fn insert_document(&self, id: impl Into<String>, document: Document) {
        self.state.lock().documents.insert(id.into(), document);
        self.notify();
    }

    pub fn len(&self) -> usize {
        self.state.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Fail every live listener with `message` and drop them, the way a
    /// revoked permission or lost connection ends a remote listener.
    pub fn fail_subscriptions(&self, message: &str) {
        let _delivery = self.delivery.lock();
        let failed: Vec<ErrorCallback> = {
            let mut state = self.state.lock();
            state
                .listeners
                .drain()
                .map(|(_, listener)| listener.on_error)
                .collect()
        };
        let error = SubscriptionError::new(message);
        for on_error in failed {
            on_error(&error);
        }
    }

    /// Push a fresh snapshot to every listener. Callbacks run outside the
    /// state lock but inside the delivery lock, and the snapshot is taken
    /// after acquiring it, so deliveries stay in write order.
    fn notify(&self) {
        let _delivery = self.delivery.lock();
        let pending: Vec<(SnapshotCallback, Vec<CiphertextRecord>)> = {
            let state = self.state.lock();
            state
                .listeners
                .values()
                .map(|l| {
                    (
                        Arc::clone(&l.on_snapshot),
                        state.snapshot(&self.collection, &l.query),
                    )
                })
                .collect()
        };
        for (on_snapshot, records) in pending {
            on_snapshot(&records);
        }
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn add(&self, record: NewRecord) -> Result<String, StoreError> {
        let document = record.to_document()?;
        let id = uuid::Uuid::new_v4().to_string();
        self.state.lock().documents.insert(id.clone(), document);
        debug!(collection = %self.collection, id = %id, "record added");
        self.notify();
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<CiphertextRecord>, StoreError> {
        let state = self.state.lock();
        state
            .documents
            .get(id)
            .map(|doc| CiphertextRecord::from_document(id, doc))
            .transpose()
    }

    async fn update(&self, id: &str, patch: &RecordPatch) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock();
            let document = state
                .documents
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            patch.apply_to(document);
        }
        debug!(collection = %self.collection, id, "record updated");
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.state.lock().documents.remove(id).is_some();
        if removed {
            debug!(collection = %self.collection, id, "record deleted");
            self.notify();
        }
        Ok(removed)
    }

    fn subscribe(
        &self,
        query: RecordQuery,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Unsubscribe {
        let delivery = self.delivery.lock();
        let (listener_id, initial) = {
            let mut state = self.state.lock();
            let listener_id = state.next_listener_id;
            state.next_listener_id += 1;
            let initial = state.snapshot(&self.collection, &query);
            state.listeners.insert(
                listener_id,
                Listener {
                    query,
                    on_snapshot: Arc::clone(&on_snapshot),
                    on_error,
                },
            );
            (listener_id, initial)
        };
        on_snapshot(&initial);
        drop(delivery);

        let state: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        Box::new(move || {
            if let Some(state) = state.upgrade() {
                state.lock().listeners.remove(&listener_id);
            }
        })
    }
}
