//! Mapping from storage keys to files
//!
//! Each key is stored at `<root>/<key>.value`. Keys are restricted to a
//! filename-safe alphabet so a key can never escape the root directory.

use localstore_core::errors::LocalStoreError;
use std::path::{Path, PathBuf};

/// Extension of files holding a stored value
pub const VALUE_EXTENSION: &str = "value";

/// Check that a key is non-empty, not hidden, and uses only `[A-Za-z0-9._-]`
pub fn validate_key(key: &str) -> Result<(), LocalStoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(LocalStoreError::InvalidStorageKey {
            key: key.to_string(),
        })
    }
}

/// Compute the file path for a key
///
/// For key "sqlite-db", returns "<root>/sqlite-db.value"
pub fn key_path(root: &Path, key: &str) -> Result<PathBuf, LocalStoreError> {
    validate_key(key)?;
    Ok(root.join(format!("{}.{}", key, VALUE_EXTENSION)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path() {
        let path = key_path(Path::new("/store"), "sqlite-db").unwrap();
        assert_eq!(path, PathBuf::from("/store/sqlite-db.value"));
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        for key in ["", "../x", "a/b", ".hidden", "a\\b", "sp ace"] {
            assert!(
                key_path(Path::new("/store"), key).is_err(),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_accepts_dotted_names() {
        assert!(validate_key("app.v1_items-db").is_ok());
    }
}
