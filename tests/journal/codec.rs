//! Integration tests for the payload codec free functions.

use sealed_journal::{decrypt, encrypt, DecryptionFailure, ImageRef, MoodKey, PlaintextEntry};

fn hello() -> PlaintextEntry {
    PlaintextEntry::new("Hello", MoodKey::Happy, "2024-01-01T00:00:00Z")
}

#[test]
fn hello_round_trips_under_the_same_key() {
    let ciphertext = encrypt(&hello(), "K1").unwrap();
    let entry = decrypt(&ciphertext, "K1").unwrap();
    assert_eq!(entry, hello());
    assert_eq!(entry.mood, MoodKey::Happy);
    assert!(entry.images.is_empty());
}

#[test]
fn ciphertext_is_printable_and_hides_the_text() {
    let entry = hello().with_images([ImageRef::new("file:///photo.jpg")]);
    let ciphertext = encrypt(&entry, "K1").unwrap();
    assert!(ciphertext.bytes().all(|b| b.is_ascii_graphic()));
    assert!(!ciphertext.contains("Hello"));
    assert!(!ciphertext.contains("photo"));
}

#[test]
fn same_entry_encrypts_differently_each_time() {
    let a = encrypt(&hello(), "K1").unwrap();
    let b = encrypt(&hello(), "K1").unwrap();
    assert_ne!(a, b);
    assert_eq!(decrypt(&a, "K1").unwrap(), decrypt(&b, "K1").unwrap());
}

#[test]
fn a_foreign_key_cannot_read() {
    let ciphertext = encrypt(&hello(), "K1").unwrap();
    assert_eq!(decrypt(&ciphertext, "K2"), Err(DecryptionFailure::InvalidKey));
    assert_eq!(decrypt(&ciphertext, ""), Err(DecryptionFailure::InvalidKey));
}

#[test]
fn junk_inputs_fail_without_panicking() {
    let inputs = [
        "",
        "not-valid-ciphertext",
        "U2FsdGVkX1+vupppZksvRf5pq5g5XjFRlipRkwB0K1Y=",
        "AQ",
        "!!!!",
    ];
    for input in inputs {
        assert_eq!(
            decrypt(input, "K1"),
            Err(DecryptionFailure::MalformedCiphertext),
            "input {input:?}"
        );
    }
}

#[test]
fn empty_key_cannot_encrypt() {
    assert!(encrypt(&hello(), "").is_err());
}
