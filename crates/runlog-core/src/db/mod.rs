//! SQLite persistence for runs, training plans, settings and users.
//!
//! [`Database`] is the entry point. It owns a [`ConnectionSupervisor`] that
//! opens the store with bounded retries, applies pending migrations and hands
//! damaged stores to the [`RecoveryAgent`]. Writes are bracketed by a
//! [`TransactionCoordinator`] so a failure part-way through leaves no partial
//! rows behind.
//!
//! Query methods are split by concern across the `*_queries` modules, each
//! adding an `impl Database` block.

use std::{path::Path, str::FromStr};

use jiff::{fmt::temporal::DateTimePrinter, Timestamp};
use rusqlite::{types::Type, Connection, Row};

use crate::error::Result;

pub mod connection;
pub mod migrations;
pub mod plan_queries;
pub mod recovery;
pub mod run_queries;
pub mod settings_queries;
pub mod stats_queries;
pub mod transaction;
pub mod user_queries;

pub use connection::{ConnectionConfig, ConnectionSupervisor};
pub use recovery::{RecoveryAgent, RecoveryOutcome, RecoveryReport};
pub use transaction::TransactionCoordinator;

/// Database connection and operations handler.
pub struct Database {
    supervisor: ConnectionSupervisor,
}

impl Database {
    /// Opens (creating if needed) the store at `path` with default settings.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, ConnectionConfig::default())
    }

    /// Opens the store at `path`, running migrations before returning.
    pub fn with_config<P: AsRef<Path>>(path: P, config: ConnectionConfig) -> Result<Self> {
        let mut supervisor = ConnectionSupervisor::new(path.as_ref(), config);
        supervisor.acquire()?;
        Ok(Self { supervisor })
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        self.supervisor.path()
    }

    /// A live connection, reopened if the cached one stopped answering.
    pub fn connection(&mut self) -> Result<&Connection> {
        self.supervisor.acquire()
    }

    /// Releases the underlying connection. The next call reopens it.
    pub fn close(&mut self) {
        self.supervisor.release();
    }

    /// Highest applied schema migration.
    pub fn schema_version(&mut self) -> Result<u32> {
        migrations::schema_version(self.connection()?)
    }

    /// Re-runs the schema check. Opening already does this.
    pub fn ensure_schema(&mut self) -> Result<()> {
        migrations::ensure_schema(self.connection()?)
    }

    /// Runs `work` inside a single transaction, committing only if it succeeds.
    pub(crate) fn write<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connection()?;
        let mut tx = TransactionCoordinator::new(conn);
        tx.begin()?;
        let value = work(conn)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Fixed-width RFC 3339 text, so stored timestamps sort chronologically.
pub(crate) fn timestamp_text(timestamp: &Timestamp) -> String {
    DateTimePrinter::new()
        .precision(Some(9))
        .timestamp_to_string(timestamp)
}

/// Parses a text column, reporting failures as a conversion error on that column.
pub(crate) fn parse_column<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(column)?;
    text.parse::<T>().map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}
