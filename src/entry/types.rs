use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::mood::MoodKey;

/// Reference to an image attached to an entry. Only the URI is kept;
/// picker metadata (dimensions, mime type) is ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub uri: String,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Decrypted, structured journal entry as the UI layer sees it.
///
/// This is also the canonical payload shape: it serializes to
/// `{"text","mood","date","images":[{"uri"}]}` before encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaintextEntry {
    pub text: String,
    pub mood: MoodKey,
    /// ISO-8601 timestamp of the day the entry belongs to.
    pub date: String,
    pub images: Vec<ImageRef>,
}

impl PlaintextEntry {
    pub fn new(text: impl Into<String>, mood: MoodKey, date: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mood,
            date: date.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageRef>) -> Self {
        self.images = images.into_iter().collect();
        self
    }

    /// An entry with only whitespace and no images carries nothing worth saving.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }

    /// UTC calendar day of `date`, if it parses as RFC 3339.
    pub fn day(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc).date_naive())
    }
}
