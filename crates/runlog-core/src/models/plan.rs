//! Training plan hierarchy: plan → weeks → daily sessions.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Number of sessions in every training week.
pub const DAYS_PER_WEEK: u8 = 7;

/// Workout type given to sessions created with a new plan.
pub const REST_WORKOUT: &str = "Rest";

/// Intensity given to rest sessions.
pub const REST_INTENSITY: &str = "None";

/// A multi-week structured training program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingPlan {
    pub id: u64,

    pub name: String,

    /// Target of the plan, e.g. "Sub-50 10K"
    pub goal: Option<String>,

    /// Number of weeks; the plan owns exactly this many weeks
    pub duration_weeks: u32,

    /// Athlete level the plan is written for
    pub level: Option<String>,

    pub notes: Option<String>,

    pub created_at: Timestamp,

    /// Touched by any change to the plan, its weeks or their sessions
    pub updated_at: Timestamp,

    /// Weeks in order (eager-loaded by `get_training_plan`)
    #[serde(default)]
    pub weeks: Vec<TrainingWeek>,
}

/// One week of a training plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingWeek {
    pub id: u64,

    pub plan_id: u64,

    /// 1-based position within the plan
    pub week_number: u32,

    pub focus: Option<String>,

    /// Planned distance for the week in kilometers
    pub total_distance: f64,

    pub notes: Option<String>,

    /// Seven sessions, Monday (0) through Sunday (6)
    #[serde(default)]
    pub sessions: Vec<TrainingSession>,
}

/// One day of a training week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSession {
    pub id: u64,

    pub week_id: u64,

    /// 0 = Monday … 6 = Sunday
    pub day_of_week: u8,

    pub workout_type: String,

    /// Planned distance in kilometers
    pub distance: f64,

    /// Planned duration in whole minutes
    pub duration: u32,

    pub intensity: String,

    pub pace_target: Option<String>,

    pub hr_zone: Option<String>,

    pub details: Option<String>,
}

impl TrainingSession {
    /// True when the session is a rest day.
    pub fn is_rest(&self) -> bool {
        self.workout_type.eq_ignore_ascii_case(REST_WORKOUT)
    }
}

/// English day name for a 0-based `day_of_week`.
pub fn day_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        6 => "Sunday",
        _ => "Unknown",
    }
}
