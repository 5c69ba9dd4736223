//! Durable key-value storage for throttle state.
//!
//! The throttle only ever needs a couple of scalar string slots, so the
//! storage seam is a minimal get/set/remove interface. `ThrottleStore` layers
//! the typed slots on top and turns every storage failure into "absent".

mod file;
mod memory;
mod slots;

use anyhow::Result;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use slots::{ThrottleStore, EXPIRATION_KEY, REQUEST_COUNT_KEY};

/// String key-value storage that outlives the process.
///
/// Implementations must not cache values between calls: other processes may
/// share the same backing storage and every read has to observe their writes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
