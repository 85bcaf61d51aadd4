//! In-memory key-value storage
//!
//! Used by tests and by callers that do not want anything on disk. An
//! optional byte quota reproduces host storage that rejects writes once full.

use crate::errors::{storage_unavailable, Result};
use crate::storage::KeyValueStore;
use localstore_core::errors::{ExError, ExErrorKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                let cause = ExError::new(ExErrorKind::StorageUnavailable).with_message(format!(
                    "quota exceeded: {} bytes needed, {} allowed",
                    needed, quota
                ));
                return Err(storage_unavailable("storage_set", key, cause));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut storage = MemoryStorage::new();

        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_quota_rejects_oversized_value() {
        let mut storage = MemoryStorage::with_quota(8);

        let err = storage.set("k", "0123456789").unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);
        assert!(storage.is_empty(), "rejected write must not be stored");
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(6);

        storage.set("k", "12345").unwrap();
        // Replacing the same key reuses its budget
        storage.set("k", "54321").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("54321"));
    }
}
