//! Journal payload codec: canonical JSON, sealed with the session key.
//!
//! Encrypt: PlaintextEntry → JSON → AES-256-GCM → base64url text
//! Decrypt: base64url text → AES-256-GCM → JSON → PlaintextEntry
//!
//! Decryption never panics. Every failure is one of the three
//! [`DecryptionFailure`] kinds so a caller can drop a single record and keep
//! going.

use sealed_crypto::{base64url_decode, base64url_encode, ContentCipher};
use serde_json::Value;

use crate::entry::{ImageRef, MoodKey, PlaintextEntry};
use crate::error::{DecryptionFailure, JournalError, Result};
use crate::key_manager::EncryptionKey;

/// Codec bound to one key. The content key is derived once, so decoding a
/// whole snapshot costs one HKDF expansion.
pub struct PayloadCodec {
    cipher: ContentCipher,
}

impl PayloadCodec {
    pub fn new(key: &EncryptionKey) -> Result<Self> {
        Self::from_secret(key.expose_secret())
    }

    fn from_secret(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(JournalError::EmptyKey);
        }
        let cipher = ContentCipher::from_secret(secret)?;
        Ok(Self { cipher })
    }

    /// Serialize and seal an entry. Output is printable base64url text.
    pub fn encrypt(&self, entry: &PlaintextEntry) -> Result<String> {
        let json = serde_json::to_vec(entry)?;
        let blob = self.cipher.encrypt(&json)?;
        Ok(base64url_encode(&blob))
    }

    /// Open and parse a stored ciphertext.
    pub fn decrypt(&self, ciphertext: &str) -> std::result::Result<PlaintextEntry, DecryptionFailure> {
        if ciphertext.is_empty() {
            return Err(DecryptionFailure::MalformedCiphertext);
        }
        let blob = base64url_decode(ciphertext).map_err(|e| DecryptionFailure::from(&e))?;
        let plaintext = self
            .cipher
            .decrypt(&blob)
            .map_err(|e| DecryptionFailure::from(&e))?;
        parse_payload(&plaintext)
    }
}

/// Seal `entry` under `key`. The key must be non-empty.
pub fn encrypt(entry: &PlaintextEntry, key: &str) -> Result<String> {
    PayloadCodec::from_secret(key)?.encrypt(entry)
}

/// Open `ciphertext` under `key`. An empty key can open nothing and reports
/// [`DecryptionFailure::InvalidKey`], unless the ciphertext is malformed.
pub fn decrypt(ciphertext: &str, key: &str) -> std::result::Result<PlaintextEntry, DecryptionFailure> {
    match PayloadCodec::from_secret(key) {
        Ok(codec) => codec.decrypt(ciphertext),
        Err(_) => match sealed_crypto::open_from_string(ciphertext, key) {
            Err(e) if e.is_malformed() => Err(DecryptionFailure::MalformedCiphertext),
            _ => Err(DecryptionFailure::InvalidKey),
        },
    }
}

/// Parse decrypted bytes into an entry.
///
/// Strict on shape (must be a JSON object with a string `date`), lenient on
/// content: a missing `text` reads as empty, a missing or unknown `mood`
/// reads as neutral, image items without a `uri` are skipped.
fn parse_payload(plaintext: &[u8]) -> std::result::Result<PlaintextEntry, DecryptionFailure> {
    if plaintext.is_empty() {
        return Err(DecryptionFailure::MalformedPayload);
    }
    let text = std::str::from_utf8(plaintext).map_err(|_| DecryptionFailure::MalformedPayload)?;
    let value: Value = serde_json::from_str(text).map_err(|_| DecryptionFailure::MalformedPayload)?;
    let Value::Object(obj) = value else {
        return Err(DecryptionFailure::MalformedPayload);
    };

    let date = match obj.get("date") {
        Some(Value::String(d)) => d.clone(),
        _ => return Err(DecryptionFailure::MalformedPayload),
    };

    let text = match obj.get("text") {
        Some(Value::String(t)) => t.clone(),
        _ => String::new(),
    };

    let mood = match obj.get("mood") {
        Some(Value::String(m)) => {
            let mood = MoodKey::from_key_or_neutral(m);
            if mood.as_str() != m.as_str() {
                tracing::debug!(stored = %m, "unknown mood in payload; reading as neutral");
            }
            mood
        }
        _ => MoodKey::Neutral,
    };

    let images = match obj.get("images") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.get("uri") {
                Some(Value::String(uri)) => Some(ImageRef::new(uri.clone())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(PlaintextEntry {
        text,
        mood,
        date,
        images,
    })
}
