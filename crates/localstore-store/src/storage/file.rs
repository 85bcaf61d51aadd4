//! Filesystem-backed key-value storage
//!
//! One file per key under a root directory, written atomically.

use crate::errors::{io_error, storage_unavailable, Result};
use crate::storage::atomic::atomic_write;
use crate::storage::key_path::key_path;
use crate::storage::KeyValueStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store persisted as files under `root`
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = key_path(&self.root, key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_unavailable(
                "storage_get",
                key,
                io_error("read_storage", e),
            )),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = key_path(&self.root, key)?;
        atomic_write(&path, value.as_bytes())
            .map_err(|e| storage_unavailable("storage_set", key, e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = key_path(&self.root, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_unavailable(
                "storage_remove",
                key,
                io_error("remove_storage", e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localstore_core::ExErrorKind;
    use tempfile::TempDir;

    fn setup_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("kv"));
        (storage, temp_dir)
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (mut storage, _dir) = setup_storage();

        storage.set("sqlite-db", "U1FMaXRl").unwrap();

        assert_eq!(
            storage.get("sqlite-db").unwrap().as_deref(),
            Some("U1FMaXRl")
        );
    }

    #[test]
    fn test_get_missing_is_none() {
        let (storage, _dir) = setup_storage();
        assert_eq!(storage.get("sqlite-db").unwrap(), None);
    }

    #[test]
    fn test_remove_then_get() {
        let (mut storage, _dir) = setup_storage();

        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();

        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut storage, _dir) = setup_storage();
        assert!(storage.remove("never-set").is_ok());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let (mut storage, _dir) = setup_storage();

        let err = storage.set("../escape", "v").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_unwritable_root_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the root directory should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let mut storage = FileStorage::new(blocker.join("kv"));

        let err = storage.set("k", "v").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);
        assert_eq!(err.key(), Some("k"));
    }
}
