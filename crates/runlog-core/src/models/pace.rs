//! Pace (minutes per kilometer) derived from a run's duration and distance.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Average pace stored as whole seconds per kilometer.
///
/// Formats as `M:SS`. A distance of zero (or less) yields [`Pace::ZERO`],
/// rendered `0:00`, instead of dividing by zero.
///
/// ```rust
/// use runlog_core::models::Pace;
///
/// assert_eq!(Pace::from_run(30, 5.0).to_string(), "6:00");
/// assert_eq!(Pace::from_run(30, 0.0).to_string(), "0:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Pace {
    seconds_per_km: u64,
}

impl Pace {
    /// Sentinel pace for runs without a distance.
    pub const ZERO: Pace = Pace { seconds_per_km: 0 };

    /// Builds a pace from a raw seconds-per-kilometer value.
    pub fn from_seconds(seconds_per_km: u64) -> Self {
        Self { seconds_per_km }
    }

    /// Computes the pace of a run of `duration_min` minutes over
    /// `distance_km` kilometers, rounded to the nearest whole second.
    pub fn from_run(duration_min: u32, distance_km: f64) -> Self {
        if distance_km.is_nan() || distance_km <= 0.0 {
            return Self::ZERO;
        }
        let seconds = (f64::from(duration_min) * 60.0 / distance_km).round();
        Self {
            seconds_per_km: seconds as u64,
        }
    }

    /// Whole seconds per kilometer.
    pub fn seconds_per_km(&self) -> u64 {
        self.seconds_per_km
    }

    /// True for the `0:00` sentinel.
    pub fn is_zero(&self) -> bool {
        self.seconds_per_km == 0
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}",
            self.seconds_per_km / 60,
            self.seconds_per_km % 60
        )
    }
}

impl FromStr for Pace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minutes, seconds) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid pace: {s}"))?;
        let minutes: u64 = minutes
            .parse()
            .map_err(|_| format!("Invalid pace minutes: {s}"))?;
        let seconds: u64 = seconds
            .parse()
            .map_err(|_| format!("Invalid pace seconds: {s}"))?;
        if seconds >= 60 {
            return Err(format!("Invalid pace seconds: {s}"));
        }
        Ok(Self {
            seconds_per_km: minutes * 60 + seconds,
        })
    }
}

impl From<Pace> for String {
    fn from(pace: Pace) -> Self {
        pace.to_string()
    }
}

impl TryFrom<String> for Pace {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
