//! Tests for the logbook module.

use tempfile::TempDir;

use super::*;
use crate::{
    db::RecoveryOutcome,
    error::FailureKind,
    export::ExportFormat,
    models::{RunFilter, WorkoutType},
    params::{
        CreatePlan, CreateRun, Credentials, ExportPlan, ExportRuns, Id, RegisterUser, SetSetting,
        StatsQuery, UpdatePlan, UpdateRun, UpdateSession, UpdateWeek,
    },
};

async fn create_test_logbook() -> (TempDir, Logbook) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let logbook = LogbookBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create logbook");
    (temp_dir, logbook)
}

fn run_on(date: &str, distance: f64, duration: u32) -> CreateRun {
    CreateRun {
        date: date.to_string(),
        distance,
        duration,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_add_and_list_runs_newest_first() {
    let (_temp_dir, logbook) = create_test_logbook().await;

    for date in ["2024-01-01", "2024-03-01", "2024-02-01"] {
        logbook
            .add_run(&run_on(date, 5.0, 30))
            .await
            .expect("Failed to add run");
    }

    let runs = logbook.list_runs(None).await.expect("Failed to list runs");
    let dates: Vec<String> = runs.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    assert!(runs.iter().all(|r| r.avg_pace.to_string() == "6:00"));
}

#[tokio::test]
async fn test_update_recomputes_pace() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    let id = logbook
        .add_run(&run_on("2024-04-01", 10.0, 60))
        .await
        .expect("Failed to add run");

    let updated = logbook
        .update_run(&UpdateRun {
            id,
            run: run_on("2024-04-01", 10.0, 50),
        })
        .await
        .expect("Failed to update run");
    assert_eq!(updated.avg_pace.to_string(), "5:00");

    let missing = logbook
        .update_run(&UpdateRun {
            id: id + 100,
            run: run_on("2024-04-01", 10.0, 50),
        })
        .await
        .expect_err("update of a missing run should fail");
    assert_eq!(missing.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    let id = logbook
        .add_run(&run_on("2024-04-01", 3.0, 20))
        .await
        .expect("Failed to add run");

    assert!(logbook.delete_run(&Id { id }).await.expect("first delete"));
    assert!(!logbook.delete_run(&Id { id }).await.expect("second delete"));
    assert!(logbook.remove_run(&Id { id }).await.expect("remove").is_none());
}

#[tokio::test]
async fn test_edit_run_reports_changes() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    let created = logbook
        .record_run(&run_on("2024-05-01", 5.0, 30))
        .await
        .expect("Failed to record run");

    let result = logbook
        .edit_run(&UpdateRun {
            id: created.resource.id,
            run: CreateRun {
                notes: Some("felt easy".to_string()),
                ..run_on("2024-05-01", 5.0, 30)
            },
        })
        .await
        .expect("Failed to edit run");
    assert_eq!(result.changes, vec!["Notes updated".to_string()]);
}

#[tokio::test]
async fn test_filtered_list_and_workout_types() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    logbook
        .add_run(&CreateRun {
            workout_type: Some("Hill Repeats".to_string()),
            ..run_on("2024-06-01", 6.0, 40)
        })
        .await
        .expect("Failed to add run");
    logbook
        .add_run(&run_on("2024-06-02", 5.0, 30))
        .await
        .expect("Failed to add run");

    let hills = logbook
        .list_runs(Some(RunFilter {
            workout_type: Some(WorkoutType::from_label("hill repeats")),
            ..Default::default()
        }))
        .await
        .expect("Failed to list runs");
    assert_eq!(hills.len(), 1);

    let types = logbook.workout_types().await.expect("workout types");
    assert_eq!(types.get(0).map(String::as_str), Some("Street Run"));
    assert_eq!(types.iter().last().map(String::as_str), Some("Hill Repeats"));
}

#[tokio::test]
async fn test_statistics_and_monthly_distance() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    for (date, distance, duration) in [("2023-02-10", 4.0, 24), ("2023-02-20", 6.0, 30)] {
        logbook
            .add_run(&run_on(date, distance, duration))
            .await
            .expect("Failed to add run");
    }

    let query = StatsQuery {
        user_id: None,
        year: Some(2023),
    };
    let stats = logbook.run_statistics(&query).await.expect("statistics");
    assert_eq!(stats.total_runs, 2);
    assert_eq!(stats.total_distance, 10.0);

    let table = logbook
        .monthly_distance_table(&query)
        .await
        .expect("monthly distance");
    assert_eq!(table.year, 2023);
    assert_eq!(table.months.len(), 12);
    assert_eq!(table.months[1].runs, 2);
}

#[tokio::test]
async fn test_plan_lifecycle() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    let plan = logbook
        .create_training_plan(&CreatePlan {
            name: "Base block".to_string(),
            duration_weeks: 3,
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    assert_eq!(plan.weeks.len(), 3);
    assert!(plan.weeks.iter().all(|w| w.sessions.len() == 7));

    let week_id = plan.weeks[0].id;
    let week = logbook
        .update_training_week(&UpdateWeek {
            id: week_id,
            focus: Some("Easy mileage".to_string()),
            total_distance: 25.0,
            notes: None,
        })
        .await
        .expect("Failed to update week");
    assert_eq!(week.focus.as_deref(), Some("Easy mileage"));

    let session_id = week.sessions[2].id;
    let session = logbook
        .update_training_session(&UpdateSession {
            id: session_id,
            workout_type: "Interval".to_string(),
            distance: 8.0,
            duration: 45,
            intensity: "High".to_string(),
            pace_target: Some("4:30".to_string()),
            hr_zone: Some("Z4".to_string()),
            details: Some("6 x 800m".to_string()),
        })
        .await
        .expect("Failed to update session");
    assert!(!session.is_rest());

    let edited = logbook
        .edit_plan(&UpdatePlan {
            id: plan.id,
            plan: CreatePlan {
                name: "Base block".to_string(),
                duration_weeks: 2,
                ..Default::default()
            },
        })
        .await
        .expect("Failed to edit plan");
    assert_eq!(edited.resource.weeks.len(), 2);
    assert_eq!(edited.changes, vec!["Duration: 3 → 2 weeks".to_string()]);

    let removed = logbook
        .remove_plan(&Id { id: plan.id })
        .await
        .expect("Failed to delete plan");
    assert!(removed.is_some());
    assert!(logbook
        .get_training_plan(&Id { id: plan.id })
        .await
        .expect("get plan")
        .is_none());
}

#[tokio::test]
async fn test_settings_and_users() {
    let (_temp_dir, logbook) = create_test_logbook().await;

    logbook
        .set_setting(&SetSetting {
            key: "units".to_string(),
            value: "imperial".to_string(),
        })
        .await
        .expect("Failed to set setting");
    assert_eq!(
        logbook.get_setting("units").await.expect("get").as_deref(),
        Some("imperial")
    );
    assert_eq!(logbook.settings_list().await.expect("list").len(), 2);

    let user = logbook
        .register_user(&RegisterUser {
            username: "kim".to_string(),
            password: "intervals".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to register");
    let authenticated = logbook
        .authenticate(&Credentials {
            username: "kim".to_string(),
            password: "intervals".to_string(),
        })
        .await
        .expect("Failed to authenticate");
    assert_eq!(authenticated.map(|u| u.id), Some(user.id));

    let fetched = logbook
        .get_user(&Id { id: user.id })
        .await
        .expect("Failed to get user");
    assert_eq!(fetched.map(|u| u.username), Some("kim".to_string()));
    assert!(logbook
        .get_user(&Id { id: 999 })
        .await
        .expect("Failed to get user")
        .is_none());
}

#[tokio::test]
async fn test_export_runs_and_plan() {
    let (temp_dir, logbook) = create_test_logbook().await;
    let first = logbook
        .add_run(&run_on("2024-01-05", 5.0, 30))
        .await
        .expect("Failed to add run");
    logbook
        .add_run(&run_on("2024-01-06", 7.0, 42))
        .await
        .expect("Failed to add run");

    let path = temp_dir.path().join("out").join("runs.csv");
    let report = logbook
        .export_to_csv(&ExportRuns {
            path: path.clone(),
            ids: vec![first],
        })
        .await
        .expect("Failed to export");
    assert_eq!(report.rows, 1);
    let text = std::fs::read_to_string(&path).expect("read export");
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().nth(1).expect("row").starts_with(&format!("{first},2024-01-05,")));

    let plan = logbook
        .create_training_plan(&CreatePlan {
            name: "Taper".to_string(),
            duration_weeks: 1,
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    let plan_path = temp_dir.path().join("plan.csv");
    let plan_report = logbook
        .export_plan_to_csv(&ExportPlan {
            plan_id: plan.id,
            path: plan_path,
        })
        .await
        .expect("Failed to export plan");
    assert_eq!(plan_report.rows, 7);
    assert_eq!(plan_report.format, ExportFormat::Csv);
}

#[cfg(not(feature = "spreadsheet"))]
#[tokio::test]
async fn test_spreadsheet_export_unavailable() {
    let (temp_dir, logbook) = create_test_logbook().await;
    assert!(!logbook.is_spreadsheet_export_available());

    let path = temp_dir.path().join("runs.xlsx");
    let err = logbook
        .export_to_spreadsheet(&ExportRuns {
            path: path.clone(),
            ids: Vec::new(),
        })
        .await
        .expect_err("spreadsheet export should be unavailable");
    assert_eq!(err.kind(), FailureKind::CapabilityUnavailable);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_check_store_on_healthy_store() {
    let (_temp_dir, logbook) = create_test_logbook().await;
    let report = logbook.check_store().await.expect("check store");
    assert_eq!(report.outcome, RecoveryOutcome::Healthy);
    assert!(report.backup_path.is_none());
}
