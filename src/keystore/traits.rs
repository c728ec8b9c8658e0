use async_trait::async_trait;

use crate::error::KeyStoreError;

/// Secure, device-local string storage (keychain, keystore, or similar).
///
/// The backing primitive is external to this crate and trusted. Each call
/// either succeeds or reports a distinct read/write error; nothing retries.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Read the value stored under `name`, `None` when nothing is stored.
    async fn get(&self, name: &str) -> Result<Option<String>, KeyStoreError>;

    /// Store `value` under `name`, replacing any previous value.
    async fn set(&self, name: &str, value: &str) -> Result<(), KeyStoreError>;
}
