//! Write path for one user's journal: plaintext in, ciphertext records out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::codec::PayloadCodec;
use crate::entry::{CiphertextRecord, NewRecord, PlaintextEntry, RecordPatch};
use crate::error::{JournalError, Result, StoreError};
use crate::key_manager::EncryptionKey;
use crate::store::EntryStore;

/// CRUD over a user's records. Bound to one key, so every record it writes
/// opens under the same key the projector reads with.
pub struct EntryRepository {
    store: Arc<dyn EntryStore>,
    codec: PayloadCodec,
    user_id: String,
}

impl EntryRepository {
    pub fn new(
        store: Arc<dyn EntryStore>,
        user_id: impl Into<String>,
        key: &EncryptionKey,
    ) -> Result<Self> {
        Ok(Self {
            store,
            codec: PayloadCodec::new(key)?,
            user_id: user_id.into(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Encrypt and store a new private entry. Returns the record id.
    pub async fn create(&self, entry: &PlaintextEntry) -> Result<String> {
        if entry.is_empty() {
            return Err(JournalError::EmptyEntry);
        }
        let ciphertext = self.codec.encrypt(entry)?;
        let id = self
            .store
            .add(NewRecord::private(&self.user_id, ciphertext, Utc::now()))
            .await?;
        info!(record_id = %id, images = entry.images.len(), "journal entry created");
        Ok(id)
    }

    /// Fetch and decrypt one record.
    pub async fn read(&self, id: &str) -> Result<PlaintextEntry> {
        let record = self.fetch_own(id).await?;
        Ok(self.codec.decrypt(&record.encrypted_content)?)
    }

    /// Replace an entry's content. A shared record gets its mirror fields
    /// rewritten in the same update.
    pub async fn update(&self, id: &str, entry: &PlaintextEntry) -> Result<()> {
        if entry.is_empty() {
            return Err(JournalError::EmptyEntry);
        }
        let record = self.fetch_own(id).await?;
        let ciphertext = self.codec.encrypt(entry)?;
        let mut patch = RecordPatch::content(ciphertext, Utc::now());
        if record.is_shared {
            patch = patch.with_mirror(entry);
        }
        self.store.update(id, &patch).await?;
        debug!(record_id = %id, shared = record.is_shared, "journal entry updated");
        Ok(())
    }

    /// Turn sharing on or off. Sharing decrypts the stored content and
    /// mirrors exactly that; unsharing deletes the mirror fields.
    pub async fn set_shared(&self, id: &str, shared: bool) -> Result<()> {
        let record = self.fetch_own(id).await?;
        let now = Utc::now();
        let patch = if shared {
            let entry = self.codec.decrypt(&record.encrypted_content)?;
            RecordPatch::share(&entry, now)
        } else {
            RecordPatch::unshare(now)
        };
        self.store.update(id, &patch).await?;
        info!(record_id = %id, shared, "journal entry share state changed");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.fetch_own(id).await?;
        if !self.store.delete(id).await? {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        info!(record_id = %id, "journal entry deleted");
        Ok(())
    }

    /// Records of other users are reported as missing.
    async fn fetch_own(&self, id: &str) -> Result<CiphertextRecord> {
        match self.store.get(id).await? {
            Some(record) if record.user_id == self.user_id => Ok(record),
            _ => Err(StoreError::NotFound(id.to_string()).into()),
        }
    }
}
