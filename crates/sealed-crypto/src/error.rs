use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Secret must not be empty")]
    EmptySecret,

    #[error("Encrypted data too short")]
    DataTooShort,

    #[error("Unsupported encryption version: {0}")]
    UnsupportedVersion(u8),

    #[error("Invalid base64url encoding: {0}")]
    Encoding(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

impl CryptoError {
    /// True when the bytes could not even be framed as a sealed blob
    /// (bad encoding, truncated, unknown version), as opposed to a blob
    /// that parsed but would not open under the given key.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CryptoError::DataTooShort | CryptoError::UnsupportedVersion(_) | CryptoError::Encoding(_)
        )
    }
}
