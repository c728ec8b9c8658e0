pub mod memory;
pub mod types;

pub use memory::MemoryEntryStore;
pub use types::{
    EntryStore, ErrorCallback, RecordQuery, SnapshotCallback, SortOrder, Subscription, Unsubscribe,
};
