pub mod memory;
pub mod traits;

pub use memory::MemoryKeyStore;
pub use traits::KeyStore;
