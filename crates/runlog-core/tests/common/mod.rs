use std::path::Path;

use runlog_core::{params::CreateRun, Logbook, LogbookBuilder};
use tempfile::TempDir;

/// Helper function to create a test logbook in its own directory
#[allow(dead_code)]
pub async fn create_test_logbook() -> (TempDir, Logbook) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let logbook = LogbookBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create logbook");
    (temp_dir, logbook)
}

/// A run with only the required fields set.
#[allow(dead_code)]
pub fn run_on(date: &str, distance: f64, duration: u32) -> CreateRun {
    CreateRun {
        date: date.to_string(),
        distance,
        duration,
        ..Default::default()
    }
}

/// Number of backup files created next to `db_path`.
#[allow(dead_code)]
pub fn backup_count(db_path: &Path) -> usize {
    let Some(dir) = db_path.parent() else {
        return 0;
    };
    std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.contains(".backup-") && !name.ends_with("-wal")
        })
        .count()
}
