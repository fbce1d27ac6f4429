use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color against `db_path`
fn runlog_cmd(db_path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("runlog").expect("Failed to find runlog binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

fn add_run(db_path: &std::path::Path, date: &str, distance: &str, duration: &str) {
    runlog_cmd(db_path)
        .args(["run", "add", date, distance, duration])
        .assert()
        .success();
}

#[test]
fn test_cli_add_run_derives_pace() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["run", "add", "2024-05-04", "10", "55", "--type", "Long Run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded run with ID: 1"))
        .stdout(predicate::str::contains("- Pace: 5:30 min/km"))
        .stdout(predicate::str::contains("(Long Run)"));
}

#[test]
fn test_cli_list_empty_runs() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["run", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No runs found."));
}

#[test]
fn test_cli_default_command_lists_runs_newest_first() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    add_run(&db_path, "2024-01-01", "5", "30");
    add_run(&db_path, "2024-03-01", "5", "30");
    add_run(&db_path, "2024-02-01", "5", "30");

    let output = runlog_cmd(&db_path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8 output");
    let march = text.find("2024-03-01").expect("march run listed");
    let february = text.find("2024-02-01").expect("february run listed");
    let january = text.find("2024-01-01").expect("january run listed");
    assert!(march < february && february < january);
}

#[test]
fn test_cli_invalid_date_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["run", "add", "2024-02-30", "5", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("date"));
}

#[test]
fn test_cli_show_missing_run_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["run", "show", "99999"])
        .assert()
        .failure();
}

#[test]
fn test_cli_delete_is_idempotent() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_run(&db_path, "2024-04-01", "8", "44");

    runlog_cmd(&db_path)
        .args(["run", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted run of 2024-04-01 (ID: 1)"));

    runlog_cmd(&db_path)
        .args(["run", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notice: Run 1 not found"));
}

#[test]
fn test_cli_edit_run_lists_changes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_run(&db_path, "2024-04-01", "10", "60");

    runlog_cmd(&db_path)
        .args(["run", "edit", "1", "2024-04-01", "10", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated run with ID: 1"))
        .stdout(predicate::str::contains("Pace: 6:00 → 5:00"));
}

#[test]
fn test_cli_json_output() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_run(&db_path, "2024-04-01", "5", "25");

    runlog_cmd(&db_path)
        .args(["--json", "run", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"avg_pace\": \"5:00\""))
        .stdout(predicate::str::contains("\"workout_type\": \"Street Run\""));
}

#[test]
fn test_cli_workout_types() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["run", "add", "2024-04-01", "5", "25", "--type", "Hill Repeats"])
        .assert()
        .success();

    runlog_cmd(&db_path)
        .args(["run", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Street Run"))
        .stdout(predicate::str::contains("- Hill Repeats"));
}

#[test]
fn test_cli_stats() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_run(&db_path, "2024-01-10", "5", "30");
    add_run(&db_path, "2024-01-20", "10", "50");

    runlog_cmd(&db_path)
        .args(["run", "stats", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Runs: 2"))
        .stdout(predicate::str::contains("- Total distance: 15.00 km"))
        .stdout(predicate::str::contains("- Fastest pace: 5:00 min/km"));

    runlog_cmd(&db_path)
        .args(["run", "stats", "--year", "2024", "--monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| 01 | 15.00 | 2 |"));
}

#[test]
fn test_cli_export_csv() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let csv_path = temp_dir.path().join("runs.csv");
    add_run(&db_path, "2024-01-10", "5", "30");
    add_run(&db_path, "2024-01-20", "10", "50");

    runlog_cmd(&db_path)
        .args(["export", "csv", "--ids", "2", "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 rows as CSV"));

    let text = std::fs::read_to_string(&csv_path).expect("read export");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(
            "ID,Date,Distance (km),Duration (min),Pace (min/km),Avg BPM,Max BPM,\
             Elevation Gain (m),Calories,Workout Type,Notes"
        )
    );
    assert_eq!(
        lines.next(),
        Some("2,2024-01-20,10.00,50,5:00,N/A,N/A,N/A,N/A,Street Run,N/A")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn test_cli_plan_workflow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["plan", "create", "Spring 10K", "--weeks", "2", "--goal", "Sub 50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created training plan with ID: 1"))
        .stdout(predicate::str::contains("### Week 2"))
        .stdout(predicate::str::contains("- **Sunday**: Rest"));

    runlog_cmd(&db_path)
        .args(["plan", "week", "1", "--focus", "Base", "--distance", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### Week 1: Base"));

    runlog_cmd(&db_path)
        .args([
            "plan", "session", "2", "Interval", "--distance", "8", "--intensity", "High",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **Tuesday**: Interval (High), 8.00 km"));

    runlog_cmd(&db_path)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Spring 10K (ID: 1)"));

    runlog_cmd(&db_path)
        .args(["plan", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted training plan 'Spring 10K'"));

    runlog_cmd(&db_path)
        .args(["plan", "show", "1"])
        .assert()
        .failure();
}

#[test]
fn test_cli_plan_export() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let csv_path = temp_dir.path().join("plan.csv");

    runlog_cmd(&db_path)
        .args(["plan", "create", "Taper", "--weeks", "1"])
        .assert()
        .success();

    runlog_cmd(&db_path)
        .args(["plan", "export", "1", "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 7 rows as CSV"));

    let text = std::fs::read_to_string(&csv_path).expect("read export");
    assert_eq!(text.lines().count(), 8);
}

#[test]
fn test_cli_settings() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["settings", "get", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = dark"));

    runlog_cmd(&db_path)
        .args(["settings", "set", "units", "imperial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Setting 'units' saved as 'imperial'"));

    runlog_cmd(&db_path)
        .args(["settings", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **units**: imperial"));
}

#[test]
fn test_cli_user_register_and_login() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    runlog_cmd(&db_path)
        .args(["user", "register", "kim", "--password", "intervals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered user with ID: 1"));

    runlog_cmd(&db_path)
        .args(["user", "register", "KIM", "--password", "other"])
        .assert()
        .failure();

    runlog_cmd(&db_path)
        .args(["user", "login", "kim", "--password", "intervals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated as kim"));

    runlog_cmd(&db_path)
        .args(["user", "login", "kim", "--password", "wrong"])
        .assert()
        .failure();
}

#[test]
fn test_cli_check_recovers_damaged_store() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_run(&db_path, "2024-01-10", "5", "30");

    std::fs::write(&db_path, vec![0x42; 8192]).expect("damage store");

    // Opening the store recovers it before any command runs.
    runlog_cmd(&db_path)
        .args(["run", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No runs found."));

    let backups = std::fs::read_dir(temp_dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".backup-"))
        .count();
    assert!(backups >= 1);

    runlog_cmd(&db_path)
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("store is healthy"));
}
