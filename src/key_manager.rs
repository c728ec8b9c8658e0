//! Lazy, single-flight creation of the device encryption key.
//!
//! The key is generated once, stored in secure storage, and never rotated.
//! Losing it makes every stored ciphertext permanently unreadable.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{JournalError, Result};
use crate::keystore::KeyStore;
use crate::options::{JournalOptions, DEFAULT_KEY_NAME};

// ============================================================================
// EncryptionKey
// ============================================================================

/// The opaque key string. Never empty; redacted in `Debug`; wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey(String);

impl EncryptionKey {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(JournalError::EmptyKey);
        }
        Ok(Self(secret))
    }

    /// The key exactly as stored.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(***)")
    }
}

// ============================================================================
// EncryptionKeyManager
// ============================================================================

/// Owns the key for one app session.
///
/// Build one per process (share it behind an `Arc`) and hand it to every
/// consumer. Concurrent `get_or_create_key` calls on the same manager await
/// a single initialization, so two keys can never be generated and race to
/// overwrite each other.
pub struct EncryptionKeyManager {
    store: Arc<dyn KeyStore>,
    key_name: String,
    key: OnceCell<EncryptionKey>,
}

impl EncryptionKeyManager {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_key_name(store, DEFAULT_KEY_NAME)
    }

    pub fn with_key_name(store: Arc<dyn KeyStore>, key_name: impl Into<String>) -> Self {
        Self {
            store,
            key_name: key_name.into(),
            key: OnceCell::new(),
        }
    }

    /// Name the key according to `options.key_scope` for the signed-in user.
    pub fn from_options(store: Arc<dyn KeyStore>, options: &JournalOptions, user_id: &str) -> Self {
        Self::with_key_name(store, options.key_name_for(user_id))
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Return the stored key, generating and persisting one if none exists.
    ///
    /// Read and write failures propagate; a failed attempt is not cached, so
    /// the next call tries again.
    pub async fn get_or_create_key(&self) -> Result<EncryptionKey> {
        let key = self
            .key
            .get_or_try_init(|| load_or_generate(self.store.as_ref(), &self.key_name))
            .await?;
        Ok(key.clone())
    }

    /// The key if a previous call already resolved it.
    pub fn cached_key(&self) -> Option<&EncryptionKey> {
        self.key.get()
    }
}

async fn load_or_generate(store: &dyn KeyStore, key_name: &str) -> Result<EncryptionKey> {
    match store.get(key_name).await? {
        Some(existing) if !existing.is_empty() => {
            tracing::debug!(key_name, "loaded encryption key from secure storage");
            EncryptionKey::new(existing)
        }
        stored => {
            if stored.is_some() {
                tracing::warn!(key_name, "stored encryption key is empty; replacing it");
            }
            let key = EncryptionKey::new(sealed_crypto::generate_secret()?)?;
            store.set(key_name, key.expose_secret()).await?;
            tracing::info!(key_name, "generated new encryption key");
            Ok(key)
        }
    }
}
