//! Core types shared across the localstore crates
//!
//! - **Correlation**: `SessionId`, attached to every session log event
//! - **Schema constants**: canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::SessionId;
