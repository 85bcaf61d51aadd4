//! localstore Store - embedded SQLite session with snapshot persistence
//!
//! Provides:
//! - `Engine`: in-memory SQLite with snapshot export/load
//! - Snapshot codec (base64 text form, header validation, digests)
//! - `KeyValueStore` trait with file-backed and in-memory implementations
//! - `LocalStoreSession`: initialize / query / insert / refresh / persist / reset
//! - `ItemsPage`: view model for the single-page item list

pub mod engine;
pub mod errors;
pub mod page;
pub mod schema;
pub mod session;
pub mod snapshot;
pub mod storage;

// Re-export key types
pub use engine::Engine;
pub use errors::Result;
pub use page::ItemsPage;
pub use session::{InitOutcome, LocalStoreSession};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
