//! Parameter structures for runlog operations.
//!
//! These structs are shared by every front end (CLI today, a GUI or web view
//! tomorrow) and carry no framework-specific derives beyond serde. Interface
//! layers wrap or convert into them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │    Logbook      │
//! │  (clap derives) │───▶│ (serde derives) │───▶│  (validation +  │
//! │                 │    │                 │    │   persistence)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Validation happens at this boundary through the `validate` methods, before
//! any statement touches the store.

use std::path::PathBuf;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunLogError};

/// Highest heart rate accepted as plausible telemetry.
pub const MAX_PLAUSIBLE_BPM: u32 = 250;

/// Longest training plan accepted, in weeks.
pub const MAX_PLAN_WEEKS: u32 = 104;

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Fields of a run as supplied by a caller.
///
/// There is deliberately no pace field: pace is always derived from
/// `duration` and `distance` when the run is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateRun {
    /// Date as `YYYY-MM-DD`
    pub date: String,
    /// Distance in kilometers (zero allowed, negative rejected)
    pub distance: f64,
    /// Duration in whole minutes (must be positive)
    pub duration: u32,
    #[serde(default)]
    pub avg_bpm: Option<u32>,
    #[serde(default)]
    pub max_bpm: Option<u32>,
    #[serde(default)]
    pub elevation_gain: Option<u32>,
    #[serde(default)]
    pub calories: Option<u32>,
    /// Workout type label; blank or missing falls back to the default type
    #[serde(default)]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

impl CreateRun {
    /// Validates the run and returns its parsed date.
    pub fn validate(&self) -> Result<Date> {
        let date = parse_date("date", &self.date)?;

        if self.distance.is_nan() {
            return Err(RunLogError::invalid_input("distance").with_reason("distance is required"));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(RunLogError::invalid_input("distance")
                .with_reason(format!("must be a non-negative number, got {}", self.distance)));
        }
        if self.duration == 0 {
            return Err(RunLogError::invalid_input("duration")
                .with_reason("must be greater than zero minutes"));
        }

        for (field, value) in [("avg_bpm", self.avg_bpm), ("max_bpm", self.max_bpm)] {
            if let Some(bpm) = value {
                if bpm == 0 || bpm > MAX_PLAUSIBLE_BPM {
                    return Err(RunLogError::invalid_input(field)
                        .with_reason(format!("must be between 1 and {MAX_PLAUSIBLE_BPM}")));
                }
            }
        }
        if let (Some(avg), Some(max)) = (self.avg_bpm, self.max_bpm) {
            if avg > max {
                return Err(RunLogError::invalid_input("avg_bpm")
                    .with_reason(format!("average {avg} exceeds maximum {max}")));
            }
        }

        Ok(date)
    }
}

/// Replace every field of an existing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRun {
    pub id: u64,
    #[serde(flatten)]
    pub run: CreateRun,
}

/// Parameters for creating a training plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    pub name: String,
    pub goal: Option<String>,
    pub duration_weeks: u32,
    pub level: Option<String>,
    pub notes: Option<String>,
}

impl CreatePlan {
    /// Validates name and week count.
    pub fn validate(&self) -> Result<()> {
        validate_plan_fields(&self.name, self.duration_weeks)
    }
}

/// Replace the header fields of an existing plan.
///
/// Changing `duration_weeks` appends rest weeks or drops trailing weeks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub id: u64,
    #[serde(flatten)]
    pub plan: CreatePlan,
}

/// Replace the fields of a training week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWeek {
    pub id: u64,
    pub focus: Option<String>,
    pub total_distance: f64,
    pub notes: Option<String>,
}

impl UpdateWeek {
    /// Rejects negative or non-finite planned distances.
    pub fn validate(&self) -> Result<()> {
        validate_planned_distance("total_distance", self.total_distance)
    }
}

/// Replace the fields of a training session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSession {
    pub id: u64,
    pub workout_type: String,
    pub distance: f64,
    /// Planned duration in whole minutes
    pub duration: u32,
    pub intensity: String,
    pub pace_target: Option<String>,
    pub hr_zone: Option<String>,
    pub details: Option<String>,
}

impl UpdateSession {
    /// Requires a workout type and a sane distance.
    pub fn validate(&self) -> Result<()> {
        if self.workout_type.trim().is_empty() {
            return Err(RunLogError::invalid_input("workout_type").with_reason("cannot be empty"));
        }
        validate_planned_distance("distance", self.distance)
    }
}

/// Parameters for registering a local user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RegisterUser {
    /// Requires a non-blank username without whitespace and a password.
    pub fn validate(&self) -> Result<()> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().any(char::is_whitespace) {
            return Err(RunLogError::invalid_input("username")
                .with_reason("must be non-empty and contain no whitespace"));
        }
        if self.password.is_empty() {
            return Err(RunLogError::invalid_input("password").with_reason("cannot be empty"));
        }
        Ok(())
    }
}

/// Username/password pair for authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Parameters for exporting runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRuns {
    /// Destination file
    pub path: PathBuf,
    /// Runs to export; empty exports every run
    #[serde(default)]
    pub ids: Vec<u64>,
}

/// Parameters for exporting a training plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportPlan {
    pub plan_id: u64,
    pub path: PathBuf,
}

/// Parameters for writing a setting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetSetting {
    pub key: String,
    pub value: String,
}

/// Scope for statistics queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    /// Only count this user's runs
    pub user_id: Option<u64>,
    /// Only count runs in this calendar year
    pub year: Option<i16>,
}

fn parse_date(field: &str, value: &str) -> Result<Date> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RunLogError::invalid_input(field).with_reason("date is required"));
    }
    trimmed.parse::<Date>().map_err(|e| {
        RunLogError::invalid_input(field).with_reason(format!("expected YYYY-MM-DD: {e}"))
    })
}

fn validate_plan_fields(name: &str, duration_weeks: u32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RunLogError::invalid_input("name").with_reason("cannot be empty"));
    }
    if duration_weeks == 0 || duration_weeks > MAX_PLAN_WEEKS {
        return Err(RunLogError::invalid_input("duration_weeks")
            .with_reason(format!("must be between 1 and {MAX_PLAN_WEEKS}")));
    }
    Ok(())
}

fn validate_planned_distance(field: &str, distance: f64) -> Result<()> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(RunLogError::invalid_input(field)
            .with_reason(format!("must be a non-negative number, got {distance}")));
    }
    Ok(())
}
