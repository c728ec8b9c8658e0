//! Counterparty feed: the plaintext mirrors of a user's shared entries.
//!
//! A reader here holds no key. Only records with `isShared` set are
//! delivered, and only their `shared*` fields are read.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::entry::{CiphertextRecord, MoodKey};
use crate::error::SubscriptionError;
use crate::projector::ProjectionState;
use crate::store::{EntryStore, RecordQuery, SortOrder, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedEntryView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub mood: MoodKey,
    pub date: String,
}

impl SharedEntryView {
    /// `None` for records without a mirror date.
    pub fn from_record(record: &CiphertextRecord) -> Option<Self> {
        let date = record.shared_date.clone()?;
        Some(Self {
            id: record.id.clone(),
            created_at: record.created_at,
            text: record.shared_text.clone().unwrap_or_default(),
            mood: record
                .shared_mood
                .as_deref()
                .map(MoodKey::from_key_or_neutral)
                .unwrap_or_default(),
            date,
        })
    }

    fn entry_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

/// Newest entry date first. Unparsable dates sort last; ties keep the
/// store's `createdAt` order.
fn sort_by_entry_date(entries: &mut [SharedEntryView]) {
    entries.sort_by(|a, b| match (a.entry_time(), b.entry_time()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn project_shared(records: &[CiphertextRecord]) -> ProjectionState<SharedEntryView> {
    let mut dropped = 0;
    let mut entries: Vec<SharedEntryView> = records
        .iter()
        .filter_map(|record| {
            let view = SharedEntryView::from_record(record);
            if view.is_none() {
                warn!(record_id = %record.id, "shared record has no mirror date");
                dropped += 1;
            }
            view
        })
        .collect();
    sort_by_entry_date(&mut entries);
    debug!(records = records.len(), dropped, "shared snapshot projected");
    ProjectionState::loaded(entries, dropped)
}

/// Live list of another user's shared entries, newest entry date first.
pub struct SharedFeed {
    state: Arc<watch::Sender<ProjectionState<SharedEntryView>>>,
    subscription: Subscription,
}

impl SharedFeed {
    pub fn start(store: &dyn EntryStore, user_id: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ProjectionState::default());
        let state = Arc::new(tx);

        let query = RecordQuery::for_user(user_id)
            .shared_only()
            .ordered(SortOrder::CreatedAtDesc);
        let on_snapshot = {
            let state = Arc::clone(&state);
            Arc::new(move |records: &[CiphertextRecord]| {
                state.send_replace(project_shared(records));
            })
        };
        let on_error = {
            let state = Arc::clone(&state);
            Arc::new(move |err: &SubscriptionError| {
                error!(error = %err, "shared feed listener failed");
                state.send_modify(|s| s.fail(err.clone()));
            })
        };

        let unsubscribe = store.subscribe(query, on_snapshot, on_error);
        Self {
            state,
            subscription: Subscription::new(unsubscribe),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProjectionState<SharedEntryView>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ProjectionState<SharedEntryView> {
        self.state.borrow().clone()
    }

    pub fn stop(&mut self) {
        self.subscription.cancel();
    }
}
