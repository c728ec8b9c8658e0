//! Live plaintext views over the ciphertext record stream.

pub mod stream;
pub mod view;

pub use stream::{ProjectorOptions, StreamProjector};
pub use view::{moods_by_day, JournalEntryView, ProjectionState};
