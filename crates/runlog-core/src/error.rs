//! Error types for the runlog persistence core.
//!
//! Every fallible operation returns [`Result<T>`]. Callers that need to branch
//! on *why* something failed use [`RunLogError::kind`], which folds the
//! detailed variants into the coarse [`FailureKind`] reasons.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

/// Coarse failure reasons surfaced across the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Lock contention or brief unavailability; retrying later may succeed.
    Transient,
    /// The store file is damaged and recovery could not restore it.
    Corruption,
    /// Input was rejected before any write was attempted.
    Validation,
    /// An optional capability (spreadsheet export) is not compiled in.
    CapabilityUnavailable,
    /// The addressed record does not exist.
    NotFound,
    /// Anything else: I/O, configuration, unexpected SQL errors.
    Internal,
}

/// Comprehensive error type for all runlog operations.
#[derive(Error, Debug)]
pub enum RunLogError {
    /// Database query or statement errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The store could not be opened within the retry bound
    #[error("Could not open store '{path}' after {attempts} attempts: {last_error}")]
    ConnectionExhausted {
        path: PathBuf,
        attempts: u32,
        last_error: String,
    },
    /// The store failed an integrity probe
    #[error("Store '{path}' failed integrity check: {detail}")]
    Corruption { path: PathBuf, detail: String },
    /// Recovery refused or failed to complete
    #[error("Recovery of '{path}' failed: {message}")]
    Recovery { path: PathBuf, message: String },
    /// Run not found for the given ID
    #[error("Run with ID {id} not found")]
    RunNotFound { id: u64 },
    /// Training plan not found for the given ID
    #[error("Training plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Training week not found for the given ID
    #[error("Training week with ID {id} not found")]
    WeekNotFound { id: u64 },
    /// Training session not found for the given ID
    #[error("Training session with ID {id} not found")]
    SessionNotFound { id: u64 },
    /// User not found for the given username
    #[error("User '{username}' not found")]
    UserNotFound { username: String },
    /// Username already taken
    #[error("User '{username}' already exists")]
    DuplicateUser { username: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Optional capability not compiled into this build
    #[error("{capability} is not available in this build")]
    CapabilityUnavailable { capability: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Export file could not be produced
    #[error("Export to '{path}' failed: {message}")]
    Export { path: PathBuf, message: String },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> RunLogError {
        RunLogError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> RunLogError {
        RunLogError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl RunLogError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Classifies this error into a [`FailureKind`].
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Database { source, .. } => classify_sqlite(source),
            Self::ConnectionExhausted { .. } => FailureKind::Transient,
            Self::Corruption { .. } | Self::Recovery { .. } => FailureKind::Corruption,
            Self::RunNotFound { .. }
            | Self::PlanNotFound { .. }
            | Self::WeekNotFound { .. }
            | Self::SessionNotFound { .. }
            | Self::UserNotFound { .. } => FailureKind::NotFound,
            Self::InvalidInput { .. } | Self::DuplicateUser { .. } => FailureKind::Validation,
            Self::CapabilityUnavailable { .. } => FailureKind::CapabilityUnavailable,
            Self::FileSystem { .. }
            | Self::Export { .. }
            | Self::XdgDirectory(_)
            | Self::Serialization { .. }
            | Self::Configuration { .. } => FailureKind::Internal,
        }
    }

    /// True when the error is a not-found outcome.
    pub fn is_not_found(&self) -> bool {
        self.kind() == FailureKind::NotFound
    }
}

fn classify_sqlite(error: &rusqlite::Error) -> FailureKind {
    if is_transient(error) {
        FailureKind::Transient
    } else if is_corruption(error) {
        FailureKind::Corruption
    } else if matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        FailureKind::Validation
    } else {
        FailureKind::Internal
    }
}

/// Lock contention: another connection holds the store.
pub(crate) fn is_transient(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// The file is not a usable SQLite database.
pub(crate) fn is_corruption(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase)
    )
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| RunLogError::database(message).with_source(e))
    }
}

/// Result type alias for runlog operations
pub type Result<T> = std::result::Result<T, RunLogError>;
