pub mod mood;
pub mod record;
pub mod types;

pub use mood::MoodKey;
pub use record::{fields, CiphertextRecord, FieldUpdate, NewRecord, RecordPatch};
pub use types::{ImageRef, PlaintextEntry};
