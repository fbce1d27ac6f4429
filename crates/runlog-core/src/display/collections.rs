//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper renders its own "nothing here" line so front ends never have
//! to special-case an empty result.

use std::{fmt, ops::Index};

use crate::models::{MonthlyDistance, Run, Setting, TrainingPlan};

/// Implements the read-only collection accessors shared by every wrapper.
macro_rules! collection_wrapper {
    ($wrapper:ident, $item:ty) => {
        impl $wrapper {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Item at `index`, if present.
            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            /// Iterator over the items.
            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $wrapper {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $wrapper {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $wrapper {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

/// Newtype wrapper for displaying a list of runs, most recent first.
///
/// # Examples
///
/// ```rust
/// use runlog_core::{
///     display::Runs,
///     models::{Pace, Run, WorkoutType},
/// };
///
/// let run = Run {
///     id: 1,
///     date: "2024-03-01".parse().unwrap(),
///     distance: 5.0,
///     duration: 25,
///     avg_pace: Pace::from_run(25, 5.0),
///     avg_bpm: None,
///     max_bpm: None,
///     elevation_gain: None,
///     calories: None,
///     workout_type: WorkoutType::Interval,
///     notes: None,
///     user_id: None,
/// };
///
/// let runs = Runs(vec![run]);
/// let output = format!("{}", runs);
/// assert!(output.contains("| 1 | 2024-03-01 | 5.00 | 25 | 5:00 | Interval |"));
/// ```
pub struct Runs(pub Vec<Run>);

collection_wrapper!(Runs, Run);

impl fmt::Display for Runs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No runs found.");
        }

        writeln!(f, "| ID | Date | Distance (km) | Duration (min) | Pace | Type |")?;
        writeln!(f, "|---:|------|--------------:|---------------:|-----:|------|")?;
        for run in &self.0 {
            writeln!(
                f,
                "| {} | {} | {:.2} | {} | {} | {} |",
                run.id, run.date, run.distance, run.duration, run.avg_pace, run.workout_type
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying plan headers.
pub struct TrainingPlans(pub Vec<TrainingPlan>);

collection_wrapper!(TrainingPlans, TrainingPlan);

impl fmt::Display for TrainingPlans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No training plans found.");
        }

        for plan in &self.0 {
            writeln!(
                f,
                "## {} (ID: {})",
                plan.name, plan.id
            )?;
            writeln!(f)?;
            writeln!(f, "- **Weeks**: {}", plan.duration_weeks)?;
            if let Some(goal) = &plan.goal {
                writeln!(f, "- **Goal**: {goal}")?;
            }
            if let Some(level) = &plan.level {
                writeln!(f, "- **Level**: {level}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying settings.
pub struct Settings(pub Vec<Setting>);

collection_wrapper!(Settings, Setting);

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No settings stored.");
        }
        for setting in &self.0 {
            write!(f, "{setting}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a year of monthly distances.
pub struct MonthlyDistances {
    pub year: i16,
    pub months: Vec<MonthlyDistance>,
}

impl fmt::Display for MonthlyDistances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Monthly distance {}", self.year)?;
        writeln!(f)?;
        writeln!(f, "| Month | Distance (km) | Runs |")?;
        writeln!(f, "|------:|--------------:|-----:|")?;
        for month in &self.months {
            write!(f, "{month}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for the selectable workout type labels.
pub struct WorkoutTypes(pub Vec<String>);

collection_wrapper!(WorkoutTypes, String);

impl fmt::Display for WorkoutTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.0 {
            writeln!(f, "- {label}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections() {
        assert_eq!(Runs(Vec::new()).to_string(), "No runs found.\n");
        assert_eq!(TrainingPlans(Vec::new()).to_string(), "No training plans found.\n");
        assert_eq!(Settings(Vec::new()).to_string(), "No settings stored.\n");
    }

    #[test]
    fn test_settings_accessors() {
        let settings = Settings(vec![Setting {
            key: "theme".to_string(),
            value: "dark".to_string(),
        }]);
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].key, "theme");
        assert_eq!(settings.to_string(), "- **theme**: dark\n");
    }

    #[test]
    fn test_monthly_table_rows() {
        let months = MonthlyDistances {
            year: 2024,
            months: vec![MonthlyDistance {
                month: 3,
                distance: 12.5,
                runs: 2,
            }],
        };
        let output = months.to_string();
        assert!(output.contains("## Monthly distance 2024"));
        assert!(output.contains("| 03 | 12.50 | 2 |"));
    }
}
