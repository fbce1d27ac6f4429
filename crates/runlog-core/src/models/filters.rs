//! Filter types for querying runs.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::WorkoutType;

/// Filter options for listing runs.
///
/// All conditions are combined with AND. Results are always ordered by date,
/// most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunFilter {
    /// Restrict to these run IDs; `None` or an empty list means no restriction
    pub ids: Option<Vec<u64>>,

    /// Restrict to runs owned by this user
    pub user_id: Option<u64>,

    /// Restrict to a single workout type
    pub workout_type: Option<WorkoutType>,

    /// Inclusive lower date bound
    pub date_from: Option<Date>,

    /// Inclusive upper date bound
    pub date_to: Option<Date>,
}

impl RunFilter {
    /// Filter selecting exactly the given IDs (all runs when empty).
    pub fn by_ids(ids: &[u64]) -> Self {
        Self {
            ids: (!ids.is_empty()).then(|| ids.to_vec()),
            ..Default::default()
        }
    }

    /// Filter selecting a single user's runs.
    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}
