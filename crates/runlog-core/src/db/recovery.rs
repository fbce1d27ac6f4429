//! Backup, repair and last-resort recreation of a damaged store.
//!
//! The agent walks a fixed escalation ladder and never skips a rung:
//!
//! 1. copy the store file (and any WAL sidecar) to a timestamped backup,
//! 2. try to repair the original in place (`REINDEX`, `VACUUM`, integrity check),
//! 3. only if repair fails, delete the original so the next open starts fresh.
//!
//! If step 1 fails nothing is deleted and the failure is returned.

use std::{
    ffi::OsString,
    fmt, fs,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use log::{info, warn};
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::error::{is_transient, Result, RunLogError};

/// Suffixes SQLite uses for files that travel with the main store file.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// What a recovery attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryOutcome {
    /// There was no store file, so there was nothing to recover.
    NotNeeded,
    /// The store passed its integrity probe (or was merely locked).
    Healthy,
    /// The store was backed up and repaired in place.
    Repaired,
    /// The store was backed up and deleted; the next open recreates it.
    Recreated,
}

impl fmt::Display for RecoveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotNeeded => "no store file present",
            Self::Healthy => "store is healthy",
            Self::Repaired => "store repaired in place",
            Self::Recreated => "store removed and will be recreated",
        };
        f.write_str(text)
    }
}

/// Result of a recovery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    pub path: PathBuf,
    pub outcome: RecoveryOutcome,
    /// Where the pre-repair copy was written, when one was taken.
    pub backup_path: Option<PathBuf>,
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.outcome)?;
        if let Some(backup) = &self.backup_path {
            write!(f, " (backup at {})", backup.display())?;
        }
        Ok(())
    }
}

/// Restores a store file to a usable state without ever losing the only copy.
#[derive(Debug, Clone)]
pub struct RecoveryAgent {
    path: PathBuf,
}

impl RecoveryAgent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probes the store and escalates through backup, repair and removal as
    /// needed. Must not be called while this process holds a connection to
    /// the store.
    pub fn attempt_recovery(&self) -> Result<RecoveryReport> {
        if !self.path.exists() {
            info!("No store at {}; nothing to recover", self.path.display());
            return Ok(self.report(RecoveryOutcome::NotNeeded, None));
        }

        if self.probe_healthy() {
            return Ok(self.report(RecoveryOutcome::Healthy, None));
        }

        let backup = self.backup()?;
        info!(
            "Backed up {} to {}",
            self.path.display(),
            backup.display()
        );

        if self.repair_in_place() {
            info!("Repaired {} in place", self.path.display());
            return Ok(self.report(RecoveryOutcome::Repaired, Some(backup)));
        }

        self.remove_store_files()?;
        warn!(
            "Removed unrecoverable store {}; a fresh one will be created",
            self.path.display()
        );
        Ok(self.report(RecoveryOutcome::Recreated, Some(backup)))
    }

    fn report(&self, outcome: RecoveryOutcome, backup_path: Option<PathBuf>) -> RecoveryReport {
        RecoveryReport {
            path: self.path.clone(),
            outcome,
            backup_path,
        }
    }

    fn probe_healthy(&self) -> bool {
        let conn = match Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cannot open {} for probing: {e}", self.path.display());
                return false;
            }
        };

        match integrity_problems(&conn, "PRAGMA quick_check") {
            Ok(problems) if problems.is_empty() => true,
            Ok(problems) => {
                warn!(
                    "Integrity probe of {} reported: {}",
                    self.path.display(),
                    problems.join("; ")
                );
                false
            }
            // Contention is not damage.
            Err(e) if is_transient(&e) => {
                warn!("Store {} is locked; treating as healthy", self.path.display());
                true
            }
            Err(e) => {
                warn!("Integrity probe of {} failed: {e}", self.path.display());
                false
            }
        }
    }

    fn backup(&self) -> Result<PathBuf> {
        let target = self.backup_target();

        let copied = fs::copy(&self.path, &target).map_err(|e| RunLogError::Recovery {
            path: self.path.clone(),
            message: format!("backup to {} failed: {e}", target.display()),
        })?;

        let original_len = fs::metadata(&self.path)
            .map(|meta| meta.len())
            .map_err(|e| RunLogError::file_system(&self.path, e))?;
        if copied != original_len {
            return Err(RunLogError::Recovery {
                path: self.path.clone(),
                message: format!(
                    "backup {} is incomplete ({copied} of {original_len} bytes)",
                    target.display()
                ),
            });
        }

        let wal = with_suffix(&self.path, "-wal");
        if wal.exists() {
            let wal_target = with_suffix(&target, "-wal");
            fs::copy(&wal, &wal_target).map_err(|e| RunLogError::Recovery {
                path: self.path.clone(),
                message: format!("backup of {} failed: {e}", wal.display()),
            })?;
        }

        Ok(target)
    }

    fn backup_target(&self) -> PathBuf {
        let stamp = Timestamp::now().strftime("%Y%m%d-%H%M%S").to_string();
        let base = with_suffix(&self.path, &format!(".backup-{stamp}"));
        if !base.exists() {
            return base;
        }
        (2u32..)
            .map(|n| with_suffix(&base, &format!("-{n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(base)
    }

    fn repair_in_place(&self) -> bool {
        let conn = match Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cannot open {} for repair: {e}", self.path.display());
                return false;
            }
        };

        let repaired = conn
            .execute_batch("REINDEX; VACUUM;")
            .and_then(|()| integrity_problems(&conn, "PRAGMA integrity_check"));

        match repaired {
            Ok(problems) if problems.is_empty() => true,
            Ok(problems) => {
                warn!("Repair left problems: {}", problems.join("; "));
                false
            }
            Err(e) => {
                warn!("Repair of {} failed: {e}", self.path.display());
                false
            }
        }
    }

    fn remove_store_files(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| RunLogError::file_system(&self.path, e))?;
        for suffix in SIDECAR_SUFFIXES {
            let sidecar = with_suffix(&self.path, suffix);
            if let Err(e) = fs::remove_file(&sidecar) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(RunLogError::file_system(sidecar, e));
                }
            }
        }
        Ok(())
    }
}

/// Rows reported by an integrity pragma other than the single `ok` row.
pub(crate) fn integrity_problems(
    conn: &Connection,
    pragma: &str,
) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(pragma)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows.into_iter().filter(|row| row != "ok").collect())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
