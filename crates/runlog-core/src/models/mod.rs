//! Data models for runs, training plans, users and statistics.
//!
//! These are the named record types handed across the persistence boundary.
//! Rows are always decoded into these structs by column name inside the
//! query modules, so adding a column never shifts a positional index in
//! calling code.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use runlog_core::models::{Pace, Run, WorkoutType};
//!
//! let run = Run {
//!     id: 1,
//!     date: "2024-03-01".parse().unwrap(),
//!     distance: 10.0,
//!     duration: 55,
//!     avg_pace: Pace::from_run(55, 10.0),
//!     avg_bpm: Some(152),
//!     max_bpm: None,
//!     elevation_gain: None,
//!     calories: Some(700),
//!     workout_type: WorkoutType::LongRun,
//!     notes: None,
//!     user_id: None,
//! };
//! assert_eq!(run.avg_pace.to_string(), "5:30");
//! ```

pub mod filters;
pub mod pace;
pub mod plan;
pub mod run;
pub mod summary;
pub mod user;
pub mod workout_type;


pub use filters::RunFilter;
pub use pace::Pace;
pub use plan::{day_name, TrainingPlan, TrainingSession, TrainingWeek};
pub use run::Run;
pub use summary::{MonthlyDistance, RunStatistics};
pub use user::{Setting, User};
pub use workout_type::WorkoutType;
