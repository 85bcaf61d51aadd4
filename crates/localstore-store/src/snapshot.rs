//! Snapshot text codec
//!
//! A snapshot is the raw bytes of a SQLite database file. Storage holds
//! strings, so snapshots are kept as standard padded base64 with no
//! envelope. Decoding also checks the SQLite file header so that garbage
//! is rejected before it reaches the engine.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use localstore_core::errors::LocalStoreError;
use sha2::{Digest, Sha256};

/// First 16 bytes of every SQLite database file
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Encode snapshot bytes into their stored text form
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode stored text back into snapshot bytes
///
/// ## Errors
///
/// - `SnapshotEncoding`: text is not valid base64
/// - `SnapshotHeader`: bytes do not start with the SQLite header
pub fn decode(text: &str) -> Result<Vec<u8>, LocalStoreError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| LocalStoreError::SnapshotEncoding {
            reason: e.to_string(),
        })?;

    if !bytes.starts_with(SQLITE_HEADER) {
        return Err(LocalStoreError::SnapshotHeader { len: bytes.len() });
    }

    Ok(bytes)
}

/// Hex SHA-256 of snapshot bytes, for logs
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
