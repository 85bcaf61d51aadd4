//! Items schema
//!
//! One table, created idempotently. The statement runs on every cold start
//! and again after a snapshot is restored, so a session never reaches
//! `Ready` without the table.

use crate::engine::Engine;
use crate::errors::Result;

/// Schema creation statement, a no-op when the table already exists
pub const ITEMS_SCHEMA: &str = include_str!("../sql/001_items.sql");

/// Read of the full item list in store order
pub const SELECT_ALL_ITEMS: &str = "SELECT * FROM items";

/// Parameterized insert; the store assigns `id`
pub const INSERT_ITEM: &str = "INSERT INTO items (name) VALUES (?1)";

/// Create the items table if it does not exist
pub fn ensure_schema(engine: &Engine) -> Result<()> {
    engine.run_batch(ITEMS_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let engine = Engine::open_fresh().unwrap();
        ensure_schema(&engine).unwrap();
        assert!(ensure_schema(&engine).is_ok());
    }

    #[test]
    fn test_schema_assigns_increasing_ids() {
        let engine = Engine::open_fresh().unwrap();
        ensure_schema(&engine).unwrap();

        engine.run(INSERT_ITEM, &["a".into()]).unwrap();
        let first = engine.last_insert_rowid();
        engine.run(INSERT_ITEM, &["b".into()]).unwrap();

        assert!(engine.last_insert_rowid() > first);
    }
}
