//! Decrypt-and-project pass over full record snapshots.
//!
//! Each snapshot from the store is decrypted record by record. A record that
//! fails is logged and dropped; the rest of the snapshot still publishes.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use super::view::{JournalEntryView, ProjectionState};
use crate::codec::PayloadCodec;
use crate::entry::CiphertextRecord;
use crate::error::{Result, SubscriptionError};
use crate::key_manager::EncryptionKey;
use crate::options::JournalOptions;
use crate::store::{EntryStore, RecordQuery, SortOrder, Subscription};

/// What a projector shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectorOptions {
    pub order: SortOrder,
    /// Only publish entries whose date falls on this UTC day.
    pub day: Option<NaiveDate>,
}

impl ProjectorOptions {
    pub fn from_journal(options: &JournalOptions) -> Self {
        Self {
            order: options.order,
            day: None,
        }
    }

    pub fn ordered(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }
}

struct Projection {
    codec: PayloadCodec,
    day: Option<NaiveDate>,
}

impl Projection {
    fn project(&self, records: &[CiphertextRecord]) -> ProjectionState {
        let mut entries = Vec::with_capacity(records.len());
        let mut dropped = 0;

        for record in records {
            let entry = match self.codec.decrypt(&record.encrypted_content) {
                Ok(entry) => entry,
                Err(reason) => {
                    warn!(record_id = %record.id, reason = %reason, "dropping undecryptable record");
                    dropped += 1;
                    continue;
                }
            };
            if let Some(day) = self.day {
                match entry.day() {
                    Some(d) if d == day => {}
                    Some(_) => continue,
                    None => {
                        warn!(record_id = %record.id, date = %entry.date, "entry date is not RFC 3339");
                        continue;
                    }
                }
            }
            entries.push(JournalEntryView {
                id: record.id.clone(),
                created_at: record.created_at,
                is_shared: record.is_shared,
                entry,
            });
        }

        debug!(
            records = records.len(),
            projected = entries.len(),
            dropped,
            "snapshot projected"
        );
        ProjectionState::loaded(entries, dropped)
    }
}

/// A live, decrypted view of one user's journal.
///
/// Starting requires both a user id and a key, so the stream can never be
/// opened before the key exists. Dropping the projector unsubscribes.
pub struct StreamProjector {
    state: Arc<watch::Sender<ProjectionState>>,
    subscription: Subscription,
}

impl StreamProjector {
    /// Subscribe to `user_id`'s records. The store delivers the current
    /// snapshot before this returns.
    pub fn start(
        store: &dyn EntryStore,
        user_id: impl Into<String>,
        key: &EncryptionKey,
        options: ProjectorOptions,
    ) -> Result<Self> {
        let projection = Projection {
            codec: PayloadCodec::new(key)?,
            day: options.day,
        };
        let (tx, _rx) = watch::channel(ProjectionState::default());
        let state = Arc::new(tx);

        let query = RecordQuery::for_user(user_id).ordered(options.order);
        let on_snapshot = {
            let state = Arc::clone(&state);
            Arc::new(move |records: &[CiphertextRecord]| {
                state.send_replace(projection.project(records));
            })
        };
        let on_error = {
            let state = Arc::clone(&state);
            Arc::new(move |err: &SubscriptionError| {
                error!(error = %err, "journal listener failed");
                state.send_modify(|s| s.fail(err.clone()));
            })
        };

        let unsubscribe = store.subscribe(query, on_snapshot, on_error);
        Ok(Self {
            state,
            subscription: Subscription::new(unsubscribe),
        })
    }

    /// A receiver that sees the current state and every replacement.
    pub fn subscribe(&self) -> watch::Receiver<ProjectionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ProjectionState {
        self.state.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Cancel the store subscription. The last state stays readable.
    pub fn stop(&mut self) {
        self.subscription.cancel();
    }
}
