//! Embedded SQL engine
//!
//! Wraps an in-memory SQLite connection and gives it the four capabilities
//! the session needs: a read path that returns result sets, a write path,
//! and snapshot export/load. Snapshots travel through SQLite's online backup
//! API via a scratch file, so a loaded snapshot lands in memory exactly as it
//! was exported.

use crate::errors::{engine_error, io_error, query_error, Result};
use localstore_core::errors::{ExError, ExErrorKind, LocalStoreError};
use localstore_core::model::{ResultSet, SqlValue};
use rusqlite::backup::Progress;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Batch, Connection, DatabaseName};
use std::io::Write;

/// File name used for the scratch copy during export
const EXPORT_FILE_NAME: &str = "snapshot.sqlite3";

/// Leading keywords SQLite reports as read-only that still change the
/// connection's transaction or attached databases
const SESSION_CONTROL_KEYWORDS: &[&str] = &[
    "BEGIN", "COMMIT", "END", "ROLLBACK", "SAVEPOINT", "RELEASE", "ATTACH", "DETACH",
];

/// A live in-memory database
pub struct Engine {
    conn: Connection,
}

impl Engine {
    /// Open a new, empty in-memory database
    pub fn open_fresh() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| engine_error("open_engine", e))?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Reconstruct a database from snapshot bytes
    ///
    /// ## Errors
    ///
    /// - `InitializationFailure`: the engine rejected the bytes or they fail
    ///   SQLite's quick integrity check
    /// - `Io`: the scratch file could not be written
    pub fn load_snapshot(bytes: &[u8]) -> Result<Self> {
        let mut staged =
            tempfile::NamedTempFile::new().map_err(|e| io_error("stage_snapshot", e))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.flush())
            .map_err(|e| io_error("stage_snapshot", e))?;

        let mut conn = Connection::open_in_memory().map_err(|e| engine_error("open_engine", e))?;
        conn.restore(DatabaseName::Main, staged.path(), None::<fn(Progress)>)
            .map_err(snapshot_load_error)?;

        let check: String = conn
            .query_row("PRAGMA quick_check", [], |row| row.get(0))
            .map_err(snapshot_load_error)?;
        if check != "ok" {
            return Err(LocalStoreError::SnapshotLoad { reason: check }.into());
        }

        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Serialize the whole database into snapshot bytes
    pub fn export_snapshot(&self) -> Result<Vec<u8>> {
        let scratch = tempfile::TempDir::new().map_err(|e| io_error("export_snapshot", e))?;
        let path = scratch.path().join(EXPORT_FILE_NAME);

        self.conn
            .backup(DatabaseName::Main, &path, None)
            .map_err(export_error)?;

        std::fs::read(&path).map_err(|e| io_error("export_snapshot", e))
    }

    /// Run read-only SQL and collect every row-producing statement's output
    ///
    /// `sql` may hold several statements; `params` bind positionally and are
    /// only accepted for a single statement. Statements that yield no rows
    /// contribute no result set. Any statement that would modify the
    /// database, open or close a transaction, or attach a database is
    /// rejected before it runs.
    pub fn exec(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<ResultSet>> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut results = Vec::new();
        let mut statement_index = 0usize;

        while let Some(mut stmt) = batch.next().map_err(|e| query_error(sql, e))? {
            if let Some(keyword) = stmt.expanded_sql().as_deref().and_then(session_control_keyword)
            {
                return Err(LocalStoreError::SessionControl {
                    sql: sql.to_string(),
                    keyword: keyword.to_string(),
                }
                .into());
            }
            if !stmt.readonly() {
                return Err(LocalStoreError::ReadOnlyViolation {
                    sql: sql.to_string(),
                }
                .into());
            }
            if statement_index > 0 && !params.is_empty() {
                return Err(LocalStoreError::ParamsWithMultipleStatements {
                    sql: sql.to_string(),
                }
                .into());
            }
            statement_index += 1;

            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut rows = stmt
                .query(params_from_iter(params.iter().map(to_engine_value)))
                .map_err(|e| query_error(sql, e))?;

            let mut values = Vec::new();
            while let Some(row) = rows.next().map_err(|e| query_error(sql, e))? {
                let cells = (0..columns.len())
                    .map(|i| row.get_ref(i).map(from_engine_value))
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(|e| query_error(sql, e))?;
                values.push(cells);
            }

            drop(rows);
            if !self.conn.is_autocommit() {
                self.abandon_transaction();
                return Err(LocalStoreError::SessionControl {
                    sql: sql.to_string(),
                    keyword: "transaction".to_string(),
                }
                .into());
            }

            if !values.is_empty() {
                results.push(ResultSet { columns, values });
            }
        }

        Ok(results)
    }

    /// Run a single statement for its side effects; returns changed row count
    pub fn run(&self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        self.conn
            .execute(sql, params_from_iter(params.iter().map(to_engine_value)))
            .map_err(|e| query_error(sql, e))
    }

    /// Run a batch of statements with no parameters and no results
    pub fn run_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| query_error(sql, e))
    }

    /// Rowid assigned by the most recent successful insert
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn abandon_transaction(&self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!(error = %e, "Failed to roll back a transaction opened by a query");
        }
    }
}

/// The session-control keyword a statement starts with, if any
///
/// Leading whitespace and SQL comments are skipped.
fn session_control_keyword(sql: &str) -> Option<&'static str> {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
    }

    let word: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    SESSION_CONTROL_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| keyword.eq_ignore_ascii_case(&word))
}

/// Connection settings applied to every engine
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| engine_error("configure_engine", e))
}

fn export_error(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("export_snapshot")
        .with_message(format!("Engine failed to export snapshot: {}", err))
}

fn snapshot_load_error(err: rusqlite::Error) -> ExError {
    LocalStoreError::SnapshotLoad {
        reason: err.to_string(),
    }
    .into()
}

fn to_engine_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(*v),
        SqlValue::Real(v) => Value::Real(*v),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

fn from_engine_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}
