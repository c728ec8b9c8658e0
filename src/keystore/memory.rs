//! In-process key store for tests and for hosts that already hold the key.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use zeroize::Zeroize;

use super::traits::KeyStore;
use crate::error::KeyStoreError;

#[derive(Default)]
pub struct MemoryKeyStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value, as if a previous session had stored it.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.lock().insert(name.into(), value.into());
        store
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.lock().contains_key(name)
    }

    /// Remove a stored value, wiping the old buffer.
    pub fn remove(&self, name: &str) -> bool {
        match self.values.lock().remove(name) {
            Some(mut old) => {
                old.zeroize();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, name: &str) -> Result<Option<String>, KeyStoreError> {
        Ok(self.values.lock().get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), KeyStoreError> {
        if let Some(mut old) = self
            .values
            .lock()
            .insert(name.to_string(), value.to_string())
        {
            old.zeroize();
        }
        Ok(())
    }
}

impl Drop for MemoryKeyStore {
    fn drop(&mut self) {
        for (_, value) in self.values.get_mut().iter_mut() {
            value.zeroize();
        }
    }
}
