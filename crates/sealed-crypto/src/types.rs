/// Wire format version for sealed journal payloads.
///
/// Version 1: AES-256-GCM under an HKDF-derived content key
/// Format: base64url([version=1:1B][IV:12B][ciphertext+tag])
pub const CURRENT_VERSION: u8 = 1;

/// Supported wire format versions (for decryption).
pub const SUPPORTED_VERSIONS: &[u8] = &[1];

/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// Smallest well-formed blob: version byte, IV and an empty message's tag.
pub const MIN_SEALED_LENGTH: usize = 1 + AES_GCM_IV_LENGTH + AES_GCM_TAG_LENGTH;

/// Random bytes behind a freshly generated secret (256 bits).
pub const GENERATED_SECRET_LENGTH: usize = 32;

/// HKDF salt for the payload content key.
pub const CONTENT_KEY_SALT: &[u8] = b"sealed-journal/v1";

/// HKDF info for the payload content key.
pub const CONTENT_KEY_INFO: &[u8] = b"journal-entry-payload";
