//! Random key-string generation.

use zeroize::Zeroize;

use crate::base64url::base64url_encode;
use crate::error::CryptoError;
use crate::types::GENERATED_SECRET_LENGTH;

/// Generate a new 256-bit secret encoded as unpadded base64url (43 chars).
///
/// The result is printable and safe to hand to any string-only secure
/// storage primitive.
pub fn generate_secret() -> Result<String, CryptoError> {
    let mut bytes = [0u8; GENERATED_SECRET_LENGTH];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    let encoded = base64url_encode(&bytes);
    bytes.zeroize();
    Ok(encoded)
}
