//! Display implementations for domain models.
//!
//! Output is markdown so front ends can hand it straight to a terminal
//! renderer. Distances are shown with two decimals, absent values are left
//! out rather than printed as placeholders.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    day_name, MonthlyDistance, RunStatistics, Run, Setting, TrainingPlan, TrainingSession,
    TrainingWeek, User,
};

fn write_optional<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: Option<T>,
) -> fmt::Result {
    match value {
        Some(value) => writeln!(f, "- {label}: {value}"),
        None => Ok(()),
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {}. {} ({})",
            self.id, self.date, self.workout_type
        )?;
        writeln!(f)?;
        writeln!(f, "- Distance: {:.2} km", self.distance)?;
        writeln!(f, "- Duration: {} min", self.duration)?;
        writeln!(f, "- Pace: {} min/km", self.avg_pace)?;
        write_optional(f, "Avg BPM", self.avg_bpm)?;
        write_optional(f, "Max BPM", self.max_bpm)?;
        write_optional(f, "Elevation gain", self.elevation_gain.map(|m| format!("{m} m")))?;
        write_optional(f, "Calories", self.calories)?;

        if let Some(notes) = self.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TrainingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rest() {
            return writeln!(f, "- **{}**: {}", day_name(self.day_of_week), self.workout_type);
        }

        write!(
            f,
            "- **{}**: {} ({})",
            day_name(self.day_of_week),
            self.workout_type,
            self.intensity
        )?;
        if self.distance > 0.0 {
            write!(f, ", {:.2} km", self.distance)?;
        }
        if self.duration > 0 {
            write!(f, ", {} min", self.duration)?;
        }
        if let Some(pace) = &self.pace_target {
            write!(f, ", pace {pace}")?;
        }
        if let Some(zone) = &self.hr_zone {
            write!(f, ", HR {zone}")?;
        }
        writeln!(f)?;
        if let Some(details) = &self.details {
            writeln!(f, "  {details}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TrainingWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "### Week {}", self.week_number)?;
        if let Some(focus) = &self.focus {
            write!(f, ": {focus}")?;
        }
        writeln!(f, " (ID: {})", self.id)?;
        writeln!(f)?;
        if self.total_distance > 0.0 {
            writeln!(f, "Target distance: {:.2} km", self.total_distance)?;
            writeln!(f)?;
        }
        for session in &self.sessions {
            write!(f, "{session}")?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TrainingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(f, "- Duration: {} weeks", self.duration_weeks)?;
        write_optional(f, "Goal", self.goal.as_deref())?;
        write_optional(f, "Level", self.level.as_deref())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        if !self.weeks.is_empty() {
            writeln!(f, "\n## Weeks")?;
            writeln!(f)?;
            for week in &self.weeks {
                write!(f, "{week}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Statistics")?;
        writeln!(f)?;
        writeln!(f, "- Runs: {}", self.total_runs)?;
        writeln!(f, "- Total distance: {:.2} km", self.total_distance)?;
        writeln!(f, "- Total duration: {} min", self.total_duration)?;
        writeln!(f, "- Longest run: {:.2} km", self.longest_run)?;
        write_optional(f, "Fastest pace", self.fastest_pace.map(|p| format!("{p} min/km")))?;
        write_optional(f, "Average pace", self.average_pace.map(|p| format!("{p} min/km")))
    }
}

impl fmt::Display for MonthlyDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {:02} | {:.2} | {} |",
            self.month, self.distance, self.runs
        )
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.username, self.id)?;
        writeln!(f)?;
        write_optional(f, "Name", self.name.as_deref())?;
        write_optional(f, "Email", self.email.as_deref())?;
        writeln!(f, "- Registered: {}", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **{}**: {}", self.key, self.value)
    }
}
