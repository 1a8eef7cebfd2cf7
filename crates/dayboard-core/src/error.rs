//! Core error types for dayboard-core.
//!
//! Every store operation either succeeds or is rejected with a [`StoreError`].
//! Nothing here is fatal: a rejected operation leaves the item set as it was,
//! except for [`StoreError::Persistence`], which is reported after the
//! in-memory mutation has already been applied.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for [`RecurrenceStore`](crate::RecurrenceStore) operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bad input shape or values on add/update
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation referenced an id that is not in the store
    #[error("Item not found: {id}")]
    NotFound { id: String },

    /// A series-scope delete was requested for an item with no recurrence
    #[error("Item '{id}' is not recurring; series scope does not apply")]
    AmbiguousScope { id: String },

    /// The mutation was applied in memory but could not be saved
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace only
    #[error("Title must not be empty")]
    EmptyTitle,

    /// Block duration is not a positive number of minutes
    #[error("Duration must be a positive number of minutes (got {0})")]
    InvalidDuration(i64),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A field that only applies to another item kind
    #[error("Field '{field}' does not apply to a {kind}")]
    KindMismatch { field: String, kind: String },

    /// Occurrence points at a series that does not exist
    #[error("Series root not found: {0}")]
    UnknownSeries(String),

    /// Occurrence points at an item that is not a series root
    #[error("Item '{0}' is not a series root")]
    NotSeriesRoot(String),

    /// Recurrence enabled on a former root that still has occurrences from
    /// its earlier series
    #[error("Item '{id}' still has {count} occurrence(s) from an earlier series; delete them first")]
    StaleOccurrences { id: String, count: usize },

    /// Occurrence dated before the series started
    #[error("Occurrence date {date} precedes series start {start}")]
    OccurrenceBeforeSeriesStart {
        date: chrono::NaiveDate,
        start: chrono::NaiveDate,
    },
}

impl ValidationError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejected memory-game moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card {index} does not exist (deck has {len} cards)")]
    OutOfRange { index: usize, len: usize },

    #[error("Card {0} is already matched")]
    AlreadyMatched(usize),

    #[error("Card {0} is already face up")]
    AlreadyFaceUp(usize),

    #[error("Every pair has been found; start a new game")]
    Finished,
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend refused the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved
    #[error("Configuration directory unavailable: {0}")]
    Dir(#[from] std::io::Error),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    PersistenceError::Locked
                } else {
                    PersistenceError::QueryFailed(err.to_string())
                }
            }
            _ => PersistenceError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for StoreError
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
