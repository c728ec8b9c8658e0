pub mod aes_gcm;
pub mod base64url;
pub mod error;
pub mod hkdf;
pub mod secret;
pub mod types;

pub use aes_gcm::{open_from_string, seal_to_string, ContentCipher};
pub use base64url::{base64url_decode, base64url_encode};
pub use error::CryptoError;
pub use hkdf::{derive_content_key, hkdf_derive};
pub use secret::generate_secret;
pub use types::{CURRENT_VERSION, SUPPORTED_VERSIONS};
