//! Versioned schema migrations.
//!
//! Applied versions are recorded in `schema_version`. Each pending migration
//! runs in its own transaction, so a failure leaves the store at the last
//! fully applied version. Every migration is idempotent: tables use
//! `IF NOT EXISTS` and added columns are guarded by table introspection, which
//! lets [`ensure_schema`] replay them to restore a table that went missing.

use jiff::Timestamp;
use log::{debug, info, warn};
use rusqlite::{params, Connection};

use super::TransactionCoordinator;
use crate::error::{DatabaseResultExt, Result};

const CREATE_SCHEMA_VERSION_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at TEXT NOT NULL
)";
const SELECT_SCHEMA_VERSION_SQL: &str = "SELECT COALESCE(MAX(version), 0) FROM schema_version";
const INSERT_SCHEMA_VERSION_SQL: &str =
    "INSERT OR IGNORE INTO schema_version (version, description, applied_at) VALUES (?1, ?2, ?3)";
const TABLE_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)";

/// Tables every current store must contain.
pub const REQUIRED_TABLES: [&str; 6] = [
    "runs",
    "settings",
    "training_plans",
    "training_weeks",
    "training_sessions",
    "users",
];

/// Highest version known to this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 4;

struct Migration {
    version: u32,
    description: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

const MIGRATIONS: [Migration; 4] = [
    Migration {
        version: 1,
        description: "runs and settings",
        apply: runs_and_settings,
    },
    Migration {
        version: 2,
        description: "run telemetry and workout type",
        apply: run_telemetry,
    },
    Migration {
        version: 3,
        description: "training plans",
        apply: training_plans,
    },
    Migration {
        version: 4,
        description: "users and run ownership",
        apply: users,
    },
];

/// Brings the store up to [`CURRENT_SCHEMA_VERSION`]. Safe to call on every open.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_SCHEMA_VERSION_SQL, [])
        .db_context("Failed to create schema_version table")?;

    let current = schema_version(conn)?;
    if current > CURRENT_SCHEMA_VERSION {
        warn!(
            "Store schema version {current} is newer than this build ({CURRENT_SCHEMA_VERSION})"
        );
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let mut tx = TransactionCoordinator::new(conn);
        tx.begin()?;
        // Another process may have migrated while we waited for the lock.
        if schema_version(conn)? >= migration.version {
            continue;
        }
        (migration.apply)(conn)?;
        conn.execute(
            INSERT_SCHEMA_VERSION_SQL,
            params![
                migration.version,
                migration.description,
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to record schema version")?;
        tx.commit()?;
        info!(
            "Applied schema migration {}: {}",
            migration.version, migration.description
        );
    }

    let missing = missing_tables(conn)?;
    if !missing.is_empty() {
        warn!("Recreating missing tables: {}", missing.join(", "));
        let mut tx = TransactionCoordinator::new(conn);
        tx.begin()?;
        for migration in &MIGRATIONS {
            (migration.apply)(conn)?;
        }
        tx.commit()?;
    }

    Ok(())
}

/// Highest applied migration version, 0 for an unversioned store.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    conn.query_row(SELECT_SCHEMA_VERSION_SQL, [], |row| row.get::<_, u32>(0))
        .db_context("Failed to read schema version")
}

/// Column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .db_context("Failed to prepare table introspection")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .db_context("Failed to introspect table")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read table columns")?;
    Ok(columns)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(TABLE_EXISTS_SQL, [table], |row| row.get(0))
        .db_context("Failed to check table existence")
}

fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            missing.push(table);
        }
    }
    Ok(missing)
}

/// Adds a column unless it is already there. Returns whether it was added.
///
/// A "duplicate column name" error (a concurrent migrator won the race) is
/// treated as success.
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    declaration: &str,
) -> Result<bool> {
    if table_columns(conn, table)?.iter().any(|c| c == column) {
        return Ok(false);
    }

    let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {declaration}");
    match conn.execute(&sql, []) {
        Ok(_) => {
            debug!("Added column {table}.{column}");
            Ok(true)
        }
        Err(e) if e.to_string().contains("duplicate column name") => Ok(false),
        Err(e) => Err(e).db_context(&format!("Failed to add column {table}.{column}")),
    }
}

fn runs_and_settings(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../../assets/migrations/0001_runs_and_settings.sql"))
        .db_context("Failed to create runs and settings tables")
}

fn run_telemetry(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "runs", "avg_bpm", "INTEGER")?;
    add_column_if_missing(conn, "runs", "max_bpm", "INTEGER")?;
    add_column_if_missing(conn, "runs", "elevation_gain", "INTEGER")?;
    add_column_if_missing(conn, "runs", "workout_type", "TEXT DEFAULT 'Street Run'")?;
    Ok(())
}

fn training_plans(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../../assets/migrations/0003_training_plans.sql"))
        .db_context("Failed to create training plan tables")
}

fn users(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../../assets/migrations/0004_users.sql"))
        .db_context("Failed to create users table")?;
    add_column_if_missing(
        conn,
        "runs",
        "user_id",
        "INTEGER REFERENCES users(id) ON DELETE SET NULL",
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_runs_user_id ON runs(user_id)",
        [],
    )
    .db_context("Failed to index runs by user")?;
    Ok(())
}
