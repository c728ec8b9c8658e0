//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::store::SortOrder;

/// Storage name of the device key when it is not scoped per user.
pub const DEFAULT_KEY_NAME: &str = "encryption_key";

/// Remote collection holding journal records.
pub const DEFAULT_COLLECTION: &str = "journal_entries";

/// How the encryption key is named in secure storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyScope {
    /// One key per device under the plain key name. Two accounts signing in
    /// on the same device share it.
    #[default]
    Device,
    /// One key per signed-in user: `<key_name>.<user_id>`.
    PerUser,
}

/// Configuration for a journal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JournalOptions {
    /// Secure storage name of the key (default: `"encryption_key"`)
    pub key_name: String,
    /// Key naming scope (default: `Device`)
    pub key_scope: KeyScope,
    /// Remote collection name (default: `"journal_entries"`)
    pub collection: String,
    /// Order of projected entries (default: newest first)
    pub order: SortOrder,
}

impl Default for JournalOptions {
    fn default() -> Self {
        Self {
            key_name: DEFAULT_KEY_NAME.to_string(),
            key_scope: KeyScope::Device,
            collection: DEFAULT_COLLECTION.to_string(),
            order: SortOrder::CreatedAtDesc,
        }
    }
}

impl JournalOptions {
    /// Parse options from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: JournalOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key_name.trim().is_empty() {
            return Err(JournalError::InvalidOptions("keyName must not be empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(JournalError::InvalidOptions(
                "collection must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Secure storage name of the key for `user_id` under the configured scope.
    pub fn key_name_for(&self, user_id: &str) -> String {
        match self.key_scope {
            KeyScope::Device => self.key_name.clone(),
            KeyScope::PerUser => format!("{}.{}", self.key_name, user_id),
        }
    }
}
