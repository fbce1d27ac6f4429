//! Markdown rendering for runs, plans and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! lists and confirmations go through the newtype wrappers here so a front
//! end only ever calls `to_string()` and hands the text to its renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Markdown      │
//! │  (Run, Plan)    │───▶│ (Runs, Create-  │───▶│   (terminal)    │
//! │                 │    │  Result, ...)   │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Runs, TrainingPlans, Settings, MonthlyDistances, WorkoutTypes
//! - [`results`]: CreateResult, UpdateResult, DeleteResult
//! - [`status`]: OperationStatus
//! - [`datetime`]: LocalDateTime
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use runlog_core::display::{OperationStatus, WorkoutTypes};
//!
//! let types = WorkoutTypes(vec!["Street Run".to_string(), "Hill Repeats".to_string()]);
//! assert_eq!(types.to_string(), "- Street Run\n- Hill Repeats\n");
//!
//! let status = OperationStatus::success("Setting 'units' saved".to_string());
//! assert_eq!(status.to_string(), "Success: Setting 'units' saved\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{MonthlyDistances, Runs, Settings, TrainingPlans, WorkoutTypes};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::{OperationStatus, StatusLevel};
