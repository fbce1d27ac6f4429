//! Workout type enumeration with a free-form fallback.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Kind of training session a run represents.
///
/// The fixed variants cover the types offered by every front end; anything
/// else round-trips through [`WorkoutType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum WorkoutType {
    #[default]
    StreetRun,
    TrailRunning,
    Treadmill,
    Interval,
    LongRun,
    Recovery,
    Fartlek,
    MountainRun,
    Other,
    /// Free-form label not in the fixed set
    Custom(String),
}

impl WorkoutType {
    /// The fixed set, in the order front ends present it.
    pub const KNOWN: [WorkoutType; 9] = [
        WorkoutType::StreetRun,
        WorkoutType::TrailRunning,
        WorkoutType::Treadmill,
        WorkoutType::Interval,
        WorkoutType::LongRun,
        WorkoutType::Recovery,
        WorkoutType::Fartlek,
        WorkoutType::MountainRun,
        WorkoutType::Other,
    ];

    /// Human-readable label, also the stored representation.
    pub fn label(&self) -> &str {
        match self {
            WorkoutType::StreetRun => "Street Run",
            WorkoutType::TrailRunning => "Trail Running",
            WorkoutType::Treadmill => "Treadmill",
            WorkoutType::Interval => "Interval",
            WorkoutType::LongRun => "Long Run",
            WorkoutType::Recovery => "Recovery",
            WorkoutType::Fartlek => "Fartlek",
            WorkoutType::MountainRun => "Mountain Run",
            WorkoutType::Other => "Other",
            WorkoutType::Custom(label) => label,
        }
    }

    /// True for labels outside the fixed set.
    pub fn is_custom(&self) -> bool {
        matches!(self, WorkoutType::Custom(_))
    }

    /// Resolves a stored or user-entered label. Blank input maps to the
    /// default type.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return WorkoutType::default();
        }
        WorkoutType::KNOWN
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| WorkoutType::Custom(trimmed.to_string()))
    }
}

impl FromStr for WorkoutType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<WorkoutType> for String {
    fn from(kind: WorkoutType) -> Self {
        kind.label().to_string()
    }
}

impl From<String> for WorkoutType {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<&str> for WorkoutType {
    fn from(value: &str) -> Self {
        Self::from_label(value)
    }
}
