//! Client-side end-to-end encryption for a journal kept in a shared document
//! store: key lifecycle, payload sealing, and live decrypted views.

pub mod codec;
pub mod entry;
pub mod error;
pub mod key_manager;
pub mod keystore;
pub mod options;
pub mod projector;
pub mod repository;
pub mod shared;
pub mod store;

pub use codec::{decrypt, encrypt, PayloadCodec};
pub use entry::{
    CiphertextRecord, FieldUpdate, ImageRef, MoodKey, NewRecord, PlaintextEntry, RecordPatch,
};
pub use error::{
    DecryptionFailure, JournalError, KeyStoreError, Result, StoreError, SubscriptionError,
};
pub use key_manager::{EncryptionKey, EncryptionKeyManager};
pub use keystore::{KeyStore, MemoryKeyStore};
pub use options::{JournalOptions, KeyScope, DEFAULT_COLLECTION, DEFAULT_KEY_NAME};
pub use projector::{moods_by_day, JournalEntryView, ProjectionState, ProjectorOptions, StreamProjector};
pub use repository::EntryRepository;
pub use shared::{SharedEntryView, SharedFeed};
pub use store::{EntryStore, MemoryEntryStore, RecordQuery, SortOrder, Subscription};
