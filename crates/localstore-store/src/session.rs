//! Local store session
//!
//! Owns one embedded database for the lifetime of a UI session and mediates
//! every access to it:
//!
//! ```text
//! Uninitialized --initialize--> Ready --query/insert/refresh/persist--> Ready
//!       ^                                                                 |
//!       +------------------------------reset------------------------------+
//!                          (reset re-runs initialize)
//! ```
//!
//! The engine only exists inside `SessionState::Ready`, so no operation can
//! reach a half-built store. Calls made while uninitialized are no-ops
//! (`query`, `insert`, `refresh`) or a `NotReady` error (`persist`).

use crate::engine::Engine;
use crate::errors::{not_ready, Result};
use crate::schema::{ensure_schema, INSERT_ITEM, SELECT_ALL_ITEMS};
use crate::snapshot;
use crate::storage::KeyValueStore;
use localstore_core::config::{SessionConfig, DEFAULT_STORAGE_KEY};
use localstore_core::errors::{ExError, ExErrorKind};
use localstore_core::model::{Item, ResultSet, SqlValue};
use localstore_core::{log_op_end, log_op_error, log_op_start};
use localstore_core_types::SessionId;
use std::time::Instant;

enum SessionState {
    Uninitialized,
    Ready(Engine),
}

/// How `initialize` obtained its store
#[derive(Debug, Clone)]
pub enum InitOutcome {
    /// No snapshot was stored; a fresh schema was created
    Fresh,
    /// The stored snapshot was loaded
    Restored { snapshot_bytes: usize },
    /// The stored snapshot (or storage itself) was unusable; a fresh store
    /// was created instead and the stored value left untouched
    Recovered { cause: ExError },
}

impl InitOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, InitOutcome::Recovered { .. })
    }

    /// The failure that forced a fallback, if any
    pub fn cause(&self) -> Option<&ExError> {
        match self {
            InitOutcome::Recovered { cause } => Some(cause),
            _ => None,
        }
    }
}

/// One embedded store bound to one persistent storage key
pub struct LocalStoreSession<S: KeyValueStore> {
    storage: S,
    storage_key: String,
    state: SessionState,
    items: Vec<Item>,
    session_id: SessionId,
}

impl<S: KeyValueStore> LocalStoreSession<S> {
    /// Create an uninitialized session persisting under the default key
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create an uninitialized session persisting under `storage_key`
    pub fn with_key(storage: S, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            storage_key: storage_key.into(),
            state: SessionState::Uninitialized,
            items: Vec::new(),
            session_id: SessionId::new(),
        }
    }

    pub fn from_config(storage: S, config: &SessionConfig) -> Self {
        Self::with_key(storage, config.storage_key.clone())
    }

    /// Create a session and initialize it in one step
    pub fn open(storage: S, storage_key: impl Into<String>) -> Result<(Self, InitOutcome)> {
        let mut session = Self::with_key(storage, storage_key);
        let outcome = session.initialize()?;
        Ok((session, outcome))
    }

    /// Bring the session to `Ready`
    ///
    /// Restores the stored snapshot if there is one, otherwise creates a
    /// fresh store with the items schema. An unusable snapshot or an
    /// unreadable storage falls back to a fresh store and is reported as
    /// `InitOutcome::Recovered`. Calling this on a ready session discards the
    /// live store and starts over from storage.
    ///
    /// ## Errors
    ///
    /// - `InitializationFailure`: not even a fresh store could be created
    pub fn initialize(&mut self) -> Result<InitOutcome> {
        let start = Instant::now();
        log_op_start!(
            "initialize",
            session_id = %self.session_id,
            storage_key = %self.storage_key
        );

        self.state = SessionState::Uninitialized;
        self.items.clear();

        let (engine, items, outcome) = match self.restore_from_storage() {
            Ok(Some((engine, items, snapshot_bytes))) => {
                (engine, items, InitOutcome::Restored { snapshot_bytes })
            }
            Ok(None) => match cold_start() {
                Ok(engine) => (engine, Vec::new(), InitOutcome::Fresh),
                Err(e) => return Err(self.fail("initialize", start, e)),
            },
            Err(cause) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    storage_key = %self.storage_key,
                    err_code = cause.code(),
                    err_message = cause.message(),
                    "Stored snapshot unusable, starting from an empty store"
                );
                match cold_start() {
                    Ok(engine) => (engine, Vec::new(), InitOutcome::Recovered { cause }),
                    Err(e) => return Err(self.fail("initialize", start, e.with_source(cause))),
                }
            }
        };

        self.state = SessionState::Ready(engine);
        self.items = items;

        log_op_end!(
            "initialize",
            duration_ms = elapsed_ms(start),
            session_id = %self.session_id,
            outcome = outcome_label(&outcome),
            item_count = self.items.len()
        );
        Ok(outcome)
    }

    /// Run read-only SQL against the store
    ///
    /// Before initialization this returns no result sets. A failing statement
    /// is logged and returned as `QueryFailure`; the session stays ready.
    pub fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<ResultSet>> {
        let SessionState::Ready(engine) = &self.state else {
            tracing::warn!(
                session_id = %self.session_id,
                op = "query",
                "Query before initialization, returning no results"
            );
            return Ok(Vec::new());
        };

        let start = Instant::now();
        log_op_start!("query", session_id = %self.session_id);
        match engine.exec(sql, params) {
            Ok(results) => {
                log_op_end!(
                    "query",
                    duration_ms = elapsed_ms(start),
                    session_id = %self.session_id,
                    result_sets = results.len()
                );
                Ok(results)
            }
            Err(e) => Err(self.fail("query", start, e)),
        }
    }

    /// Insert an item named by the trimmed input and refresh the item list
    ///
    /// Returns the store-assigned id, or `None` when the input is blank or
    /// the session is not ready (nothing is written in either case).
    pub fn insert(&mut self, name: &str) -> Result<Option<i64>> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!(session_id = %self.session_id, "Ignoring blank item name");
            return Ok(None);
        }
        let SessionState::Ready(engine) = &self.state else {
            tracing::warn!(
                session_id = %self.session_id,
                op = "insert",
                "Insert before initialization ignored"
            );
            return Ok(None);
        };

        let start = Instant::now();
        log_op_start!("insert", session_id = %self.session_id);

        let id = match engine.run(INSERT_ITEM, &[SqlValue::from(name)]) {
            Ok(_) => engine.last_insert_rowid(),
            Err(e) => return Err(self.fail("insert", start, e)),
        };
        if let Err(e) = self.refresh() {
            return Err(self.fail("insert", start, e));
        }

        log_op_end!(
            "insert",
            duration_ms = elapsed_ms(start),
            session_id = %self.session_id,
            item_id = id,
            item_count = self.items.len()
        );
        Ok(Some(id))
    }

    /// Re-read every item from the store, in store order
    ///
    /// On failure the list is emptied rather than left stale.
    pub fn refresh(&mut self) -> Result<&[Item]> {
        let read = match &self.state {
            SessionState::Uninitialized => Ok(Vec::new()),
            SessionState::Ready(engine) => read_items(engine),
        };
        match read {
            Ok(items) => {
                self.items = items;
                Ok(&self.items)
            }
            Err(e) => {
                self.items.clear();
                Err(e)
            }
        }
    }

    /// Serialize the store and write it under the storage key
    ///
    /// Overwrites any previously stored snapshot.
    ///
    /// ## Errors
    ///
    /// - `NotReady`: called before initialization
    /// - `StorageUnavailable`: the storage rejected the write
    pub fn persist(&mut self) -> Result<()> {
        let start = Instant::now();
        log_op_start!(
            "persist",
            session_id = %self.session_id,
            storage_key = %self.storage_key
        );

        let SessionState::Ready(engine) = &self.state else {
            return Err(self.fail("persist", start, not_ready("persist")));
        };
        let bytes = match engine.export_snapshot() {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail("persist", start, e)),
        };

        let text = snapshot::encode(&bytes);
        if let Err(e) = self.storage.set(&self.storage_key, &text) {
            return Err(self.fail("persist", start, e.with_key(self.storage_key.clone())));
        }

        log_op_end!(
            "persist",
            duration_ms = elapsed_ms(start),
            session_id = %self.session_id,
            snapshot_bytes = bytes.len(),
            snapshot_digest = %snapshot::digest(&bytes)
        );
        Ok(())
    }

    /// Delete the stored snapshot and restart from an empty store
    ///
    /// Irreversible. If the storage refuses the removal the session is left
    /// exactly as it was.
    pub fn reset(&mut self) -> Result<InitOutcome> {
        let start = Instant::now();
        log_op_start!(
            "reset",
            session_id = %self.session_id,
            storage_key = %self.storage_key
        );

        if let Err(e) = self.storage.remove(&self.storage_key) {
            return Err(self.fail("reset", start, e.with_key(self.storage_key.clone())));
        }

        self.state = SessionState::Uninitialized;
        self.items.clear();
        let outcome = self.initialize()?;

        log_op_end!(
            "reset",
            duration_ms = elapsed_ms(start),
            session_id = %self.session_id
        );
        Ok(outcome)
    }

    /// Items as of the last refresh
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, dropping the live store
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the stored snapshot, if any, into a ready engine with its items
    fn restore_from_storage(&self) -> Result<Option<(Engine, Vec<Item>, usize)>> {
        let Some(text) = self.storage.get(&self.storage_key)? else {
            return Ok(None);
        };

        let bytes = snapshot::decode(&text)?;
        tracing::debug!(
            session_id = %self.session_id,
            snapshot_bytes = bytes.len(),
            snapshot_digest = %snapshot::digest(&bytes),
            "Restoring stored snapshot"
        );

        let engine = Engine::load_snapshot(&bytes)?;
        let items = ensure_schema(&engine)
            .and_then(|_| read_items(&engine))
            .map_err(|e| {
                ExError::new(ExErrorKind::InitializationFailure)
                    .with_op("restore_snapshot")
                    .with_message("Snapshot loaded but its items are unreadable")
                    .with_source(e)
            })?;

        Ok(Some((engine, items, bytes.len())))
    }

    /// Log an operation failure and hand the error back
    fn fail(&self, op: &'static str, start: Instant, err: ExError) -> ExError {
        log_op_error!(
            op,
            err.clone(),
            duration_ms = elapsed_ms(start),
            session_id = %self.session_id
        );
        err
    }
}

fn cold_start() -> Result<Engine> {
    let engine = Engine::open_fresh()?;
    ensure_schema(&engine).map_err(|e| {
        ExError::new(ExErrorKind::InitializationFailure)
            .with_op("create_schema")
            .with_message(e.message().to_string())
            .with_source(e)
    })?;
    Ok(engine)
}

fn read_items(engine: &Engine) -> Result<Vec<Item>> {
    let results = engine.exec(SELECT_ALL_ITEMS, &[])?;
    Ok(Item::list_from_results(&results)?)
}

fn outcome_label(outcome: &InitOutcome) -> &'static str {
    match outcome {
        InitOutcome::Fresh => "fresh",
        InitOutcome::Restored { .. } => "restored",
        InitOutcome::Recovered { .. } => "recovered",
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_new_session_is_uninitialized() {
        let session = LocalStoreSession::new(MemoryStorage::new());
        assert!(!session.is_ready());
        assert!(session.items().is_empty());
        assert_eq!(session.storage_key(), "sqlite-db");
    }

    #[test]
    fn test_refresh_before_initialize_is_empty() {
        let mut session = LocalStoreSession::new(MemoryStorage::new());
        assert!(session.refresh().unwrap().is_empty());
    }

    #[test]
    fn test_insert_before_initialize_is_noop() {
        let mut session = LocalStoreSession::new(MemoryStorage::new());
        assert_eq!(session.insert("early").unwrap(), None);
    }

    #[test]
    fn test_outcome_accessors() {
        let recovered = InitOutcome::Recovered {
            cause: ExError::new(ExErrorKind::InitializationFailure),
        };
        assert!(recovered.is_recovered());
        assert!(recovered.cause().is_some());
        assert!(InitOutcome::Fresh.cause().is_none());
    }
}
