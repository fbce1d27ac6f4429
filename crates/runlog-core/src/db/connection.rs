//! Bounded-retry connection management with liveness probing.

use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use log::{debug, error, info, warn};
use rusqlite::Connection;

use super::{migrations, recovery::integrity_problems, RecoveryAgent};
use crate::error::{DatabaseResultExt, FailureKind, Result, RunLogError};

/// Pragmas applied to every freshly opened connection.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
";

/// Tuning knobs for opening the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Open attempts before giving up (values below 1 are treated as 1)
    pub max_attempts: u32,
    /// Pause between failed attempts
    pub retry_delay: Duration,
    /// How long SQLite waits on a locked store before reporting busy
    pub busy_timeout: Duration,
    /// Run `PRAGMA quick_check` right after opening
    pub verify_integrity_on_open: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            busy_timeout: Duration::from_secs(5),
            verify_integrity_on_open: true,
        }
    }
}

/// Owns at most one live connection to the store and hands it out on demand.
///
/// [`acquire`](Self::acquire) probes a cached connection before returning it
/// and reopens when the probe fails. Opening is retried up to
/// `max_attempts` times; a corrupted store is handed to the
/// [`RecoveryAgent`] immediately, and any other persistent failure is handed
/// to it once the retries are spent.
pub struct ConnectionSupervisor {
    path: PathBuf,
    config: ConnectionConfig,
    connection: Option<Connection>,
    #[cfg(test)]
    opens: u32,
}

impl ConnectionSupervisor {
    pub fn new(path: impl Into<PathBuf>, config: ConnectionConfig) -> Self {
        Self {
            path: path.into(),
            config,
            connection: None,
            #[cfg(test)]
            opens: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a connection is currently cached.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns a live connection, opening or reopening as needed.
    pub fn acquire(&mut self) -> Result<&Connection> {
        let alive = self.connection.as_ref().map(|conn| self.is_alive(conn));
        if alive == Some(false) {
            warn!(
                "Cached connection to {} failed its liveness probe; reopening",
                self.path.display()
            );
            self.release();
        }

        if self.connection.is_none() {
            let conn = self.open_with_retry()?;
            self.connection = Some(conn);
        }

        self.connection
            .as_ref()
            .ok_or_else(|| RunLogError::Configuration {
                message: "connection unavailable after open".to_string(),
            })
    }

    /// Closes the cached connection, if any.
    pub fn release(&mut self) {
        if let Some(conn) = self.connection.take() {
            if let Err((_, e)) = conn.close() {
                warn!("Error closing connection to {}: {e}", self.path.display());
            }
        }
    }

    fn is_alive(&self, conn: &Connection) -> bool {
        if !is_in_memory(&self.path) && !self.path.exists() {
            return false;
        }
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    /// Opens the store, retrying up to `max_attempts` times.
    ///
    /// An attempt that finds a corrupted store and recovers it is not counted,
    /// so the recovered store always gets at least one open.
    fn open_with_retry(&mut self) -> Result<Connection> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        let mut recovered = false;
        let mut last_error = String::new();

        while attempt < attempts {
            attempt += 1;
            match self.open_once() {
                Ok(conn) => {
                    if attempt > 1 {
                        info!(
                            "Opened {} on attempt {attempt}/{attempts}",
                            self.path.display()
                        );
                    }
                    return Ok(conn);
                }
                Err(e) if e.kind() == FailureKind::Corruption && !recovered => {
                    warn!("Store {} looks damaged: {e}", self.path.display());
                    recovered = true;
                    let report = RecoveryAgent::new(&self.path).attempt_recovery()?;
                    info!("Recovery finished: {report}");
                    last_error = e.to_string();
                    attempt -= 1;
                }
                Err(e) => {
                    warn!(
                        "Attempt {attempt}/{attempts} to open {} failed: {e}",
                        self.path.display()
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        thread::sleep(self.config.retry_delay);
                    }
                }
            }
        }

        error!(
            "Giving up on {} after {attempts} attempts: {last_error}",
            self.path.display()
        );
        if !recovered {
            match RecoveryAgent::new(&self.path).attempt_recovery() {
                Ok(report) => info!("Recovery finished: {report}"),
                Err(e) => error!("Recovery failed: {e}"),
            }
        }

        Err(RunLogError::ConnectionExhausted {
            path: self.path.clone(),
            attempts,
            last_error,
        })
    }

    fn open_once(&mut self) -> Result<Connection> {
        #[cfg(test)]
        {
            self.opens += 1;
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| RunLogError::file_system(parent, e))?;
            }
        }

        debug!("Opening store {}", self.path.display());
        let conn = Connection::open(&self.path).db_context("Failed to open database connection")?;
        conn.busy_timeout(self.config.busy_timeout)
            .db_context("Failed to set busy timeout")?;
        conn.execute_batch(CONNECTION_PRAGMAS)
            .db_context("Failed to apply connection pragmas")?;

        if self.config.verify_integrity_on_open {
            let problems = integrity_problems(&conn, "PRAGMA quick_check")
                .db_context("Failed to run integrity probe")?;
            if !problems.is_empty() {
                return Err(RunLogError::Corruption {
                    path: self.path.clone(),
                    detail: problems.join("; "),
                });
            }
        }

        migrations::ensure_schema(&conn)?;
        Ok(conn)
    }
}

impl Drop for ConnectionSupervisor {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == ":memory:"
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fast_config() -> ConnectionConfig {
        ConnectionConfig {
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(config.verify_integrity_on_open);
    }

    #[test]
    fn test_acquire_creates_store_and_parent_dirs() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("deeper").join("runs.db");
        let mut supervisor = ConnectionSupervisor::new(&path, fast_config());

        let conn = supervisor.acquire().expect("acquire");
        let foreign_keys: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .expect("pragma");
        assert_eq!(foreign_keys, 1);
        assert!(path.exists());
        assert!(supervisor.is_connected());
    }

    #[test]
    fn test_release_then_acquire_reopens() {
        let dir = TempDir::new().expect("temp dir");
        let mut supervisor = ConnectionSupervisor::new(dir.path().join("runs.db"), fast_config());

        supervisor.acquire().expect("first acquire");
        supervisor.release();
        assert!(!supervisor.is_connected());
        supervisor.acquire().expect("second acquire");
        assert!(supervisor.is_connected());
    }

    #[test]
    fn test_probe_failure_triggers_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("runs.db");
        let mut supervisor = ConnectionSupervisor::new(&path, fast_config());
        supervisor.acquire().expect("first acquire");

        // Pull the file out from under the cached connection.
        fs::remove_file(&path).expect("remove store");
        let conn = supervisor.acquire().expect("reacquire");

        let version = migrations::schema_version(conn).expect("schema version");
        assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);
        assert!(path.exists());
    }

    #[test]
    fn test_corrupted_store_is_recovered_on_open() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("runs.db");
        fs::write(&path, b"not a database at all".repeat(100)).expect("write garbage");

        let mut supervisor = ConnectionSupervisor::new(&path, fast_config());
        supervisor.acquire().expect("acquire after recovery");

        let backups = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".backup-"))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_exhaustion_reports_attempts() {
        let dir = TempDir::new().expect("temp dir");
        // A directory where the store file should be can never be opened.
        let path = dir.path().join("runs.db");
        fs::create_dir(&path).expect("create dir");

        let mut supervisor = ConnectionSupervisor::new(
            &path,
            ConnectionConfig {
                max_attempts: 2,
                ..fast_config()
            },
        );
        let err = supervisor.acquire().err().expect("acquire must fail");

        match err {
            RunLogError::ConnectionExhausted { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(supervisor.opens, 2);
        assert!(path.is_dir());
    }

    #[test]
    fn test_single_attempt_still_opens_recovered_store() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("runs.db");
        fs::write(&path, vec![0x42; 8192]).expect("write garbage");

        let mut supervisor = ConnectionSupervisor::new(
            &path,
            ConnectionConfig {
                max_attempts: 1,
                ..fast_config()
            },
        );
        let conn = supervisor.acquire().expect("acquire after recovery");
        let version = migrations::schema_version(conn).expect("schema version");
        assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);

        // The damaged open plus the open of the recreated store.
        assert_eq!(supervisor.opens, 2);
        assert!(path.exists());
    }
}
