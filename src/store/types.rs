//! Remote document store boundary: the trait the host's backend implements,
//! the live query description, and the subscription guard.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::{CiphertextRecord, NewRecord, RecordPatch};
use crate::error::{StoreError, SubscriptionError};

// ============================================================================
// Query
// ============================================================================

/// Ordering of records in a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Oldest first (trend views)
    CreatedAtAsc,
    /// Newest first (journal lists)
    #[default]
    CreatedAtDesc,
}

/// Live query: one user's records, optionally only the shared ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub user_id: String,
    pub shared_only: bool,
    pub order: SortOrder,
}

impl RecordQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            shared_only: false,
            order: SortOrder::default(),
        }
    }

    pub fn shared_only(mut self) -> Self {
        self.shared_only = true;
        self
    }

    pub fn ordered(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches(&self, record: &CiphertextRecord) -> bool {
        record.user_id == self.user_id && (!self.shared_only || record.is_shared)
    }

    /// Sort by `createdAt` in the query's direction; ties break on id so a
    /// snapshot's order is stable.
    pub fn sort(&self, records: &mut [CiphertextRecord]) {
        records.sort_by(|a, b| {
            let by_time = match self.order {
                SortOrder::CreatedAtAsc => a.created_at.cmp(&b.created_at),
                SortOrder::CreatedAtDesc => b.created_at.cmp(&a.created_at),
            };
            match by_time {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });
    }
}

// ============================================================================
// Callbacks
// ============================================================================

/// Receives the complete, ordered result set every time it changes.
pub type SnapshotCallback = Arc<dyn Fn(&[CiphertextRecord]) + Send + Sync>;

/// Receives a listener failure. No snapshot follows it.
pub type ErrorCallback = Arc<dyn Fn(&SubscriptionError) + Send + Sync>;

/// Cancels a live subscription.
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

// ============================================================================
// EntryStore
// ============================================================================

/// Host-implemented remote document store holding ciphertext records.
///
/// Writes are async (network round trips). `subscribe` only registers a
/// listener and returns immediately; snapshots arrive through the callback,
/// starting with the current result set, until the returned closure runs.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Create a record and return its generated id.
    async fn add(&self, record: NewRecord) -> Result<String, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<CiphertextRecord>, StoreError>;

    /// Apply a partial update. `FieldUpdate::Delete` must remove the field.
    async fn update(&self, id: &str, patch: &RecordPatch) -> Result<(), StoreError>;

    /// Delete a record. Returns false if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    fn subscribe(
        &self,
        query: RecordQuery,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Unsubscribe;
}

// ============================================================================
// Subscription
// ============================================================================

/// Owns an [`Unsubscribe`] and runs it exactly once: on `cancel` or on drop.
///
/// Tie it to the lifetime of the screen that consumes the stream so a torn
/// down view never keeps decrypting.
pub struct Subscription {
    unsubscribe: Option<Unsubscribe>,
}

impl Subscription {
    pub fn new(unsubscribe: Unsubscribe) -> Self {
        Self {
            unsubscribe: Some(unsubscribe),
        }
    }

    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// Cancel now. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
