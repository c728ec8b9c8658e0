use thiserror::Error;

/// Failure talking to the secure key storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStoreError {
    #[error("Key store read failed for \"{name}\": {message}")]
    Read { name: String, message: String },

    #[error("Key store write failed for \"{name}\": {message}")]
    Write { name: String, message: String },
}

impl KeyStoreError {
    pub fn read(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn write(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Why a single ciphertext could not be turned back into an entry.
///
/// Callers decide per record whether to drop or surface it; the stream
/// projector always drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptionFailure {
    #[error("ciphertext does not open under this key")]
    InvalidKey,

    #[error("ciphertext is malformed")]
    MalformedCiphertext,

    #[error("decrypted payload is not a journal entry")]
    MalformedPayload,
}

impl From<&sealed_crypto::CryptoError> for DecryptionFailure {
    fn from(err: &sealed_crypto::CryptoError) -> Self {
        if err.is_malformed() {
            DecryptionFailure::MalformedCiphertext
        } else {
            DecryptionFailure::InvalidKey
        }
    }
}

/// The live listener itself failed (not a single record).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Subscription failed: {message}")]
pub struct SubscriptionError {
    pub message: String,
}

impl SubscriptionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from the remote document store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid document {id}: {message}")]
    InvalidDocument { id: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    #[error("Decryption failed: {0}")]
    Decryption(#[from] DecryptionFailure),

    #[error("Crypto error: {0}")]
    Crypto(#[from] sealed_crypto::CryptoError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error("Encryption key must not be empty")]
    EmptyKey,

    #[error("Journal entry has neither text nor images")]
    EmptyEntry,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
