//! Core library for the runlog training journal.
//!
//! The crate owns everything below the user interface: the SQLite store and
//! its schema, connection retry and liveness checks, recovery of damaged
//! store files, transactional writes, the run and training plan
//! repositories, and CSV/spreadsheet export.
//!
//! # Layers
//!
//! - **Store** ([`db`]): [`Database`] over a supervised connection, with
//!   versioned migrations and a recovery agent that always backs up before it
//!   deletes anything.
//! - **Models** ([`models`]) and **Parameters** ([`params`]): records read
//!   from the store and validated inputs written to it.
//! - **Logbook** ([`logbook`]): async facade used by front ends; each call
//!   runs on the blocking pool with its own connection.
//! - **Display** ([`display`]): markdown rendering of models and results.
//! - **Export** ([`export`]): fixed-layout CSV, plus `.xlsx` when the
//!   `spreadsheet` feature is enabled.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use runlog_core::{params::CreateRun, LogbookBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logbook = LogbookBuilder::new()
//!     .with_database_path(Some("runlog.db"))
//!     .build()
//!     .await?;
//!
//! let recorded = logbook
//!     .record_run(&CreateRun {
//!         date: "2024-05-04".to_string(),
//!         distance: 12.0,
//!         duration: 66,
//!         workout_type: Some("Long Run".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{recorded}");
//!
//! for run in &logbook.list_runs_table(None).await? {
//!     println!("{} {:.2} km at {}", run.date, run.distance, run.avg_pace);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod export;
pub mod logbook;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use db::{ConnectionConfig, Database, RecoveryOutcome, RecoveryReport};
pub use display::{
    CreateResult, DeleteResult, LocalDateTime, OperationStatus, Runs, TrainingPlans, UpdateResult,
};
pub use error::{FailureKind, Result, RunLogError};
pub use export::{ExportFormat, ExportReport};
pub use logbook::{Logbook, LogbookBuilder};
pub use models::{
    MonthlyDistance, Pace, Run, RunFilter, RunStatistics, Setting, TrainingPlan, TrainingSession,
    TrainingWeek, User, WorkoutType,
};
pub use params::{
    CreatePlan, CreateRun, Credentials, ExportPlan, ExportRuns, Id, RegisterUser, SetSetting,
    StatsQuery, UpdatePlan, UpdateRun, UpdateSession, UpdateWeek,
};
