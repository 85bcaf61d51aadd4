//! Session configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) yields a working configuration.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::logging_facility::Profile;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Storage key the snapshot is persisted under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "sqlite-db";

/// Directory holding file-backed key-value storage unless configured otherwise
pub const DEFAULT_STORAGE_DIR: &str = ".localstore";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Key the base64 snapshot is stored under
    pub storage_key: String,
    /// Root directory for file-backed storage
    pub storage_dir: PathBuf,
    /// Logging profile used by binaries
    pub log_profile: Profile,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            log_profile: Profile::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(format!("Invalid config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message("storage_key must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.storage_key, "sqlite-db");
        assert_eq!(config.log_profile, Profile::Off);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = SessionConfig::from_toml_str(
            r#"
            storage_key = "shopping"
            log_profile = "production"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage_key, "shopping");
        assert_eq!(config.log_profile, Profile::Production);
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SessionConfig::from_toml_str("storage_kee = \"x\"").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = SessionConfig::from_toml_str("storage_key = \"  \"").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_dir = \"/tmp/ls\"").unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/ls"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SessionConfig::load("/nonexistent/localstore.toml").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
