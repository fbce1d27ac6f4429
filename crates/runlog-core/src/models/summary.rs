//! Aggregated statistics over logged runs.

use serde::{Deserialize, Serialize};

use super::Pace;

/// Totals and bests over a set of runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunStatistics {
    pub total_runs: u64,

    /// Sum of distances in kilometers
    pub total_distance: f64,

    /// Sum of durations in minutes
    pub total_duration: u64,

    /// Longest single run in kilometers
    pub longest_run: f64,

    /// Fastest pace among runs with a distance
    pub fastest_pace: Option<Pace>,

    /// Total duration over total distance, for runs with a distance
    pub average_pace: Option<Pace>,
}

/// Distance logged in one calendar month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyDistance {
    /// 1 = January … 12 = December
    pub month: u8,

    /// Kilometers run in the month
    pub distance: f64,

    pub runs: u64,
}
