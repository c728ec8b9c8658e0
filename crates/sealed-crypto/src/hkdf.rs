//! HKDF-SHA256 key derivation.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::types::{AES_KEY_LENGTH, CONTENT_KEY_INFO, CONTENT_KEY_SALT};

/// HKDF-SHA256 extract-and-expand to one AES-256 key.
pub fn hkdf_derive(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<[u8; AES_KEY_LENGTH], CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = [0u8; AES_KEY_LENGTH];
    hk.expand(info, &mut okm)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(okm)
}

/// Derive the AES-256 content key for journal payloads from a key string.
///
/// The key string is opaque: anything non-empty works, whether it was
/// generated by [`crate::generate_secret`] or carried over from an older
/// client. The derived bytes are wiped when the returned value drops.
pub fn derive_content_key(secret: &str) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>, CryptoError> {
    if secret.is_empty() {
        return Err(CryptoError::EmptySecret);
    }
    let okm = hkdf_derive(secret.as_bytes(), CONTENT_KEY_SALT, CONTENT_KEY_INFO)?;
    Ok(Zeroizing::new(okm))
}
