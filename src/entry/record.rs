//! Store-resident shapes: the ciphertext record, the write payload, and the
//! partial update with explicit field deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::PlaintextEntry;
use crate::error::StoreError;

/// Document field names, as stored remotely.
pub mod fields {
    pub const USER_ID: &str = "userId";
    pub const ENCRYPTED_CONTENT: &str = "encryptedContent";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const IS_SHARED: &str = "isShared";
    pub const SHARED_TEXT: &str = "sharedText";
    pub const SHARED_MOOD: &str = "sharedMood";
    pub const SHARED_DATE: &str = "sharedDate";
}

// ============================================================================
// CiphertextRecord
// ============================================================================

/// A journal entry as it lives in the remote store: an opaque ciphertext
/// plus non-sensitive metadata.
///
/// The `shared_*` fields are plaintext on purpose. They exist only while
/// `is_shared` is true so a counterparty without the key can read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiphertextRecord {
    #[serde(skip)]
    pub id: String,
    pub user_id: String,
    /// Older clients wrote this field as `cryptedContent`. A missing field
    /// reads as empty and fails decryption like any malformed blob.
    #[serde(default, alias = "cryptedContent")]
    pub encrypted_content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_date: Option<String>,
}

impl CiphertextRecord {
    /// Parse a raw store document. The id lives outside the document body.
    pub fn from_document(id: &str, document: &Map<String, Value>) -> Result<Self, StoreError> {
        let mut record: CiphertextRecord = serde_json::from_value(Value::Object(document.clone()))
            .map_err(|e| StoreError::InvalidDocument {
                id: id.to_string(),
                message: e.to_string(),
            })?;
        record.id = id.to_string();
        Ok(record)
    }
}

// ============================================================================
// NewRecord
// ============================================================================

/// Payload for creating a record; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub user_id: String,
    pub encrypted_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_shared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_date: Option<String>,
}

impl NewRecord {
    /// A private record: no mirror fields are written.
    pub fn private(
        user_id: impl Into<String>,
        encrypted_content: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            encrypted_content,
            created_at: now,
            updated_at: now,
            is_shared: false,
            shared_text: None,
            shared_mood: None,
            shared_date: None,
        }
    }

    pub fn to_document(&self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::InvalidDocument {
                id: String::new(),
                message: format!("expected object, got {other}"),
            }),
            Err(e) => Err(StoreError::InvalidDocument {
                id: String::new(),
                message: e.to_string(),
            }),
        }
    }
}

// ============================================================================
// RecordPatch
// ============================================================================

/// Update instruction for an optional document field.
///
/// `Delete` removes the key from the stored document. It is not the same
/// as `Set(String::new())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
    Delete,
}

/// Partial update of a stored record. `None` / `Keep` leave a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub encrypted_content: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_shared: Option<bool>,
    pub shared_text: FieldUpdate<String>,
    pub shared_mood: FieldUpdate<String>,
    pub shared_date: FieldUpdate<String>,
}

impl RecordPatch {
    /// Replace the ciphertext after an edit.
    pub fn content(encrypted_content: String, now: DateTime<Utc>) -> Self {
        Self {
            encrypted_content: Some(encrypted_content),
            updated_at: Some(now),
            ..Default::default()
        }
    }

    /// Turn sharing on and write the plaintext mirror of `entry`.
    pub fn share(entry: &PlaintextEntry, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            is_shared: Some(true),
            ..Default::default()
        }
        .with_mirror(entry)
    }

    /// Turn sharing off and delete every mirror field.
    pub fn unshare(now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            is_shared: Some(false),
            shared_text: FieldUpdate::Delete,
            shared_mood: FieldUpdate::Delete,
            shared_date: FieldUpdate::Delete,
            ..Default::default()
        }
    }

    /// Overwrite the mirror fields with the current plaintext of `entry`.
    pub fn with_mirror(mut self, entry: &PlaintextEntry) -> Self {
        self.shared_text = FieldUpdate::Set(entry.text.clone());
        self.shared_mood = FieldUpdate::Set(entry.mood.as_str().to_string());
        self.shared_date = FieldUpdate::Set(entry.date.clone());
        self
    }

    /// Apply this patch to a raw document in place.
    pub fn apply_to(&self, document: &mut Map<String, Value>) {
        if let Some(ref content) = self.encrypted_content {
            document.insert(
                fields::ENCRYPTED_CONTENT.to_string(),
                Value::String(content.clone()),
            );
            // A rewrite under the current field name retires the legacy one.
            document.remove("cryptedContent");
        }
        if let Some(at) = self.updated_at {
            document.insert(
                fields::UPDATED_AT.to_string(),
                Value::String(at.to_rfc3339()),
            );
        }
        if let Some(shared) = self.is_shared {
            document.insert(fields::IS_SHARED.to_string(), Value::Bool(shared));
        }
        apply_field(document, fields::SHARED_TEXT, &self.shared_text);
        apply_field(document, fields::SHARED_MOOD, &self.shared_mood);
        apply_field(document, fields::SHARED_DATE, &self.shared_date);
    }
}

fn apply_field(document: &mut Map<String, Value>, key: &str, update: &FieldUpdate<String>) {
    match update {
        FieldUpdate::Keep => {}
        FieldUpdate::Set(value) => {
            document.insert(key.to_string(), Value::String(value.clone()));
        }
        FieldUpdate::Delete => {
            document.remove(key);
        }
    }
}
