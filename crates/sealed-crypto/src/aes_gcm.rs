//! AES-256-GCM sealing for journal payloads.
//!
//! Wire format v1:
//! [1 byte: version=1][12 bytes: IV][N bytes: ciphertext + tag]
//! Stored documents carry the blob as unpadded base64url text.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::base64url::{base64url_decode, base64url_encode};
use crate::error::CryptoError;
use crate::hkdf::derive_content_key;
use crate::types::{
    AES_GCM_IV_LENGTH, AES_KEY_LENGTH, CURRENT_VERSION, MIN_SEALED_LENGTH, SUPPORTED_VERSIONS,
};

/// Generate a random 12-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; AES_GCM_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; AES_GCM_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// AES-256-GCM cipher bound to one content key.
///
/// The inner cipher zeroizes its key schedule on drop.
pub struct ContentCipher {
    cipher: Aes256Gcm,
}

impl ContentCipher {
    /// Create a cipher from 32 bytes of raw key material.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != AES_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: AES_KEY_LENGTH,
                got: key.len(),
            });
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Create a cipher for an opaque key string via HKDF.
    pub fn from_secret(secret: &str) -> Result<Self, CryptoError> {
        let key = derive_content_key(secret)?;
        Self::new(key.as_slice())
    }

    /// Encrypt data using the v1 wire format.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let iv = generate_iv()?;
        let nonce = Nonce::from_slice(&iv);

        let ciphertext = self
            .cipher
            .encrypt(nonce, data)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut result = Vec::with_capacity(1 + iv.len() + ciphertext.len());
        result.push(CURRENT_VERSION);
        result.extend_from_slice(&iv);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt a v1 blob.
    pub fn decrypt(&self, encrypted: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if encrypted.len() < MIN_SEALED_LENGTH {
            return Err(CryptoError::DataTooShort);
        }

        let version = encrypted[0];
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(CryptoError::UnsupportedVersion(version));
        }

        let iv = &encrypted[1..1 + AES_GCM_IV_LENGTH];
        let ciphertext = &encrypted[1 + AES_GCM_IV_LENGTH..];
        let nonce = Nonce::from_slice(iv);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
    }
}

/// Seal `data` under a key string and return transport-safe text.
pub fn seal_to_string(data: &[u8], secret: &str) -> Result<String, CryptoError> {
    let cipher = ContentCipher::from_secret(secret)?;
    let blob = cipher.encrypt(data)?;
    Ok(base64url_encode(&blob))
}

/// Open text produced by [`seal_to_string`].
///
/// Framing is checked before the key is touched, so malformed input is
/// reported as such no matter which key is supplied.
pub fn open_from_string(sealed: &str, secret: &str) -> Result<Vec<u8>, CryptoError> {
    let blob = base64url_decode(sealed)?;
    if blob.len() < MIN_SEALED_LENGTH {
        return Err(CryptoError::DataTooShort);
    }
    if !SUPPORTED_VERSIONS.contains(&blob[0]) {
        return Err(CryptoError::UnsupportedVersion(blob[0]));
    }
    let cipher = ContentCipher::from_secret(secret)?;
    cipher.decrypt(&blob)
}
