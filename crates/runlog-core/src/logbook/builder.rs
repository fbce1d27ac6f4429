//! Builder for creating and configuring Logbook instances.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use super::Logbook;
use crate::{
    db::{ConnectionConfig, Database},
    error::{Result, RunLogError},
};

/// Builder for creating and configuring Logbook instances.
#[derive(Debug, Clone, Default)]
pub struct LogbookBuilder {
    database_path: Option<PathBuf>,
    connection_config: ConnectionConfig,
}

impl LogbookBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/runlog/runlog.db` or `~/.local/share/runlog/runlog.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Overrides retry and integrity-check settings for opening the store.
    pub fn with_connection_config(mut self, config: ConnectionConfig) -> Self {
        self.connection_config = config;
        self
    }

    /// Builds the logbook, creating and migrating the store if needed.
    ///
    /// # Errors
    ///
    /// Returns `RunLogError::XdgDirectory` if no default location can be found,
    /// `RunLogError::FileSystem` if the parent directory cannot be created, and
    /// the open error if the store cannot be opened or recovered.
    pub async fn build(self) -> Result<Logbook> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| RunLogError::file_system(parent, e))?;
            }
        }

        debug!("Using store at {}", db_path.display());
        let db_path_clone = db_path.clone();
        let config = self.connection_config.clone();
        task::spawn_blocking(move || {
            let _db = Database::with_config(&db_path_clone, config)?;
            Ok::<(), RunLogError>(())
        })
        .await
        .map_err(|e| RunLogError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Logbook::new(db_path, self.connection_config))
    }

    /// Returns the default database path following the XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("runlog")
            .place_data_file("runlog.db")
            .map_err(|e| RunLogError::XdgDirectory(e.to_string()))
    }
}
