//! localstore Core - domain types and ambient facilities
//!
//! This crate provides what every localstore crate shares:
//! - `Item`, `SqlValue` and `ResultSet`, the shapes data takes on its way
//!   out of the embedded store
//! - The structured error facility (`ExError`, `ExErrorKind`)
//! - The logging facility (`init`, `log_op_*` macros, test capture)
//! - Session configuration loaded from TOML

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use config::SessionConfig;
pub use errors::{ExError, ExErrorKind, LocalStoreError, Result};
pub use model::{Item, ResultSet, SqlValue};

#[doc(hidden)]
pub use localstore_core_types as core_types;
