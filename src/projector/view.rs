use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::entry::{MoodKey, PlaintextEntry};
use crate::error::SubscriptionError;

/// A decrypted entry merged with its record metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntryView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub is_shared: bool,
    pub entry: PlaintextEntry,
}

impl JournalEntryView {
    pub fn mood(&self) -> MoodKey {
        self.entry.mood
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.entry.day()
    }
}

/// What a live view publishes. Every snapshot replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionState<T = JournalEntryView> {
    pub entries: Arc<[T]>,
    /// True until the first snapshot or a listener failure arrives.
    pub loading: bool,
    /// Records in the last snapshot that could not be projected.
    pub dropped: usize,
    /// Set once the listener fails. No further snapshots follow.
    pub error: Option<SubscriptionError>,
}

impl<T> Default for ProjectionState<T> {
    fn default() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
            loading: true,
            dropped: 0,
            error: None,
        }
    }
}

impl<T> ProjectionState<T> {
    pub(crate) fn loaded(entries: Vec<T>, dropped: usize) -> Self {
        Self {
            entries: Arc::from(entries),
            loading: false,
            dropped,
            error: None,
        }
    }

    /// Stop loading and record the failure; the last entries stay visible.
    pub(crate) fn fail(&mut self, error: SubscriptionError) {
        self.loading = false;
        self.error = Some(error);
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Group moods by the UTC day of each entry's date, in entry order.
/// Entries whose date does not parse are left out.
pub fn moods_by_day(entries: &[JournalEntryView]) -> BTreeMap<NaiveDate, Vec<MoodKey>> {
    let mut days: BTreeMap<NaiveDate, Vec<MoodKey>> = BTreeMap::new();
    for view in entries {
        if let Some(day) = view.day() {
            days.entry(day).or_default().push(view.mood());
        }
    }
    days
}
