//! Persistent key-value storage
//!
//! The session persists its snapshot through this narrow interface:
//! string values under string keys, with get/set/remove. Implementations
//! report every failure as `StorageUnavailable` (or `InvalidInput` for keys
//! they cannot represent); a successful return always means the value was
//! durably written or removed.

mod atomic;
mod file;
mod key_path;
mod memory;

pub use file::FileStorage;
pub use key_path::validate_key;
pub use memory::MemoryStorage;

use crate::errors::Result;

/// Host key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key succeeds
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
