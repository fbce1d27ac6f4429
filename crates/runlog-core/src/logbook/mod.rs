//! High-level async API over the run log store.
//!
//! [`Logbook`] is what front ends talk to. Every operation runs on tokio's
//! blocking pool and opens its own [`Database`] for the duration of that one
//! unit of work, so no connection outlives the call that needed it.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │  (display-ready │───▶│ (run_ops,       │───▶│   (via db/)     │
//! │   wrappers)     │    │  plan_ops, ...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Logbook`] instances
//! - [`run_ops`]: Run repository and statistics
//! - [`plan_ops`]: Training plans, weeks and sessions
//! - [`account_ops`]: Settings and users
//! - [`export_ops`]: CSV/spreadsheet export and store health checks
//! - [`handlers`]: Operations returning display wrappers for front ends
//!
//! # Example
//!
//! ```rust,no_run
//! use runlog_core::{params::CreateRun, LogbookBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logbook = LogbookBuilder::new()
//!     .with_database_path(Some("/tmp/runlog.db"))
//!     .build()
//!     .await?;
//!
//! let id = logbook
//!     .add_run(&CreateRun {
//!         date: "2024-05-04".to_string(),
//!         distance: 5.0,
//!         duration: 30,
//!         ..Default::default()
//!     })
//!     .await?;
//! let run = logbook.get_run(id).await?;
//! assert_eq!(run.map(|r| r.avg_pace.to_string()), Some("6:00".to_string()));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::{ConnectionConfig, Database},
    error::{Result, RunLogError},
};

pub mod account_ops;
pub mod builder;
pub mod export_ops;
pub mod handlers;
pub mod plan_ops;
pub mod run_ops;

#[cfg(test)]
mod tests;

pub use builder::LogbookBuilder;

/// Main interface for recording runs and managing training plans.
#[derive(Debug, Clone)]
pub struct Logbook {
    pub(crate) db_path: PathBuf,
    pub(crate) config: ConnectionConfig,
}

impl Logbook {
    pub(crate) fn new(db_path: PathBuf, config: ConnectionConfig) -> Self {
        Self { db_path, config }
    }

    /// Path of the store this logbook writes to.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `work` against a freshly opened database on the blocking pool.
    pub(crate) async fn with_database<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let config = self.config.clone();

        task::spawn_blocking(move || {
            let mut db = Database::with_config(&db_path, config)?;
            work(&mut db)
        })
        .await
        .map_err(|e| RunLogError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
