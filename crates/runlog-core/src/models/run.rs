//! Run model definition.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Pace, WorkoutType};

/// One logged training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    /// Surrogate key assigned by the store
    pub id: u64,

    /// Calendar date of the run
    pub date: Date,

    /// Distance in kilometers; zero means "no distance recorded"
    pub distance: f64,

    /// Duration in whole minutes
    pub duration: u32,

    /// Average pace, always recomputed from `duration` and `distance`
    pub avg_pace: Pace,

    /// Average heart rate (bpm)
    pub avg_bpm: Option<u32>,

    /// Maximum heart rate (bpm)
    pub max_bpm: Option<u32>,

    /// Elevation gain in meters
    pub elevation_gain: Option<u32>,

    pub calories: Option<u32>,

    #[serde(default)]
    pub workout_type: WorkoutType,

    pub notes: Option<String>,

    /// Owning user, when the store is used in multi-user mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}
