use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (and the UI layer)
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Session lifecycle
    /// Snapshot present but undecodable or rejected by the engine, or the engine failed to start
    InitializationFailure,
    /// Operation requires a ready session
    NotReady,

    // Store access
    /// Malformed statement, constraint violation, or a row that does not fit the item shape
    QueryFailure,
    /// Persistent key-value storage could not be read or written
    StorageUnavailable,

    // Structural/Validation
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InitializationFailure => "ERR_INITIALIZATION_FAILURE",
            ExErrorKind::NotReady => "ERR_NOT_READY",
            ExErrorKind::QueryFailure => "ERR_QUERY_FAILURE",
            ExErrorKind::StorageUnavailable => "ERR_STORAGE_UNAVAILABLE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus
/// optional context for debugging: the operation, the storage key, and the
/// SQL text involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    sql: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            sql: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add storage key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add SQL statement context
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the storage key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the SQL context, if any
    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(sql) = &self.sql {
            write!(f, " (sql: {})", sql)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures of the local store session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalStoreError {
    // ===== Snapshot Errors =====
    /// Persisted snapshot text is not valid base64
    #[error("Snapshot text is not valid base64: {reason}")]
    SnapshotEncoding { reason: String },

    /// Decoded snapshot does not start with the SQLite file header
    #[error("Snapshot is not a SQLite database ({len} bytes)")]
    SnapshotHeader { len: usize },

    /// Engine refused to load the snapshot bytes
    #[error("Engine failed to load snapshot: {reason}")]
    SnapshotLoad { reason: String },

    // ===== Query Errors =====
    /// Statement failed to prepare or execute
    #[error("Query failed: {reason}")]
    Query { sql: String, reason: String },

    /// A mutating statement was passed to the read path
    #[error("Statement is not read-only")]
    ReadOnlyViolation { sql: String },

    /// Transaction control or database attachment passed to the read path
    #[error("{keyword} is not allowed in a query")]
    SessionControl { sql: String, keyword: String },

    /// Positional parameters given alongside more than one statement
    #[error("Parameters cannot be bound to a multi-statement query")]
    ParamsWithMultipleStatements { sql: String },

    /// A row did not have the shape of an item
    #[error("Malformed item row: {reason}")]
    MalformedRow { reason: String },

    // ===== Storage Errors =====
    /// Key-value storage rejected the operation
    #[error("Storage unavailable for key {key}: {reason}")]
    StorageUnavailable { key: String, reason: String },

    /// Storage key cannot be mapped to a storage location
    #[error("Invalid storage key: {key:?}")]
    InvalidStorageKey { key: String },

    // ===== Lifecycle Errors =====
    /// Operation attempted before initialization completed
    #[error("Session is not ready for {op}")]
    NotReady { op: String },
}

impl From<LocalStoreError> for ExError {
    fn from(err: LocalStoreError) -> Self {
        let message = err.to_string();
        match err {
            LocalStoreError::SnapshotEncoding { .. }
            | LocalStoreError::SnapshotHeader { .. }
            | LocalStoreError::SnapshotLoad { .. } => {
                ExError::new(ExErrorKind::InitializationFailure)
                    .with_op("load_snapshot")
                    .with_message(message)
            }

            LocalStoreError::Query { sql, .. }
            | LocalStoreError::ReadOnlyViolation { sql }
            | LocalStoreError::SessionControl { sql, .. }
            | LocalStoreError::ParamsWithMultipleStatements { sql } => {
                ExError::new(ExErrorKind::QueryFailure)
                    .with_op("query")
                    .with_sql(sql)
                    .with_message(message)
            }

            LocalStoreError::MalformedRow { .. } => ExError::new(ExErrorKind::QueryFailure)
                .with_op("refresh")
                .with_message(message),

            LocalStoreError::StorageUnavailable { key, .. } => {
                ExError::new(ExErrorKind::StorageUnavailable)
                    .with_key(key)
                    .with_message(message)
            }

            LocalStoreError::InvalidStorageKey { key } => ExError::new(ExErrorKind::InvalidInput)
                .with_key(key)
                .with_message(message),

            LocalStoreError::NotReady { op } => ExError::new(ExErrorKind::NotReady)
                .with_op(op)
                .with_message(message),
        }
    }
}
