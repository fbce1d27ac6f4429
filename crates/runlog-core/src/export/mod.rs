//! Export Adapter: runs and training plans to CSV or spreadsheet files.
//!
//! Export is a pure read followed by serialization; it never writes to the
//! store. Spreadsheet output is an optional capability (the `spreadsheet`
//! cargo feature). Callers can ask up front with
//! [`is_spreadsheet_export_available`], and a build without it reports
//! [`RunLogError::CapabilityUnavailable`] before touching the filesystem.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use jiff::{civil::DateTime, Zoned};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    error::{Result, RunLogError},
    models::{day_name, Run, RunFilter, TrainingPlan},
};

pub mod csv;
#[cfg(feature = "spreadsheet")]
pub mod spreadsheet;

/// Header row of every run export.
pub const RUN_HEADERS: [&str; 11] = [
    "ID",
    "Date",
    "Distance (km)",
    "Duration (min)",
    "Pace (min/km)",
    "Avg BPM",
    "Max BPM",
    "Elevation Gain (m)",
    "Calories",
    "Workout Type",
    "Notes",
];

/// Header row of every training plan export.
pub const PLAN_HEADERS: [&str; 10] = [
    "Week",
    "Focus",
    "Day",
    "Workout Type",
    "Distance (km)",
    "Duration (min)",
    "Intensity",
    "Pace Target",
    "HR Zone",
    "Details",
];

/// Written in place of an absent optional value, so "no data" never reads as zero.
pub const MISSING_VALUE: &str = "N/A";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }

    /// Whether this build can write the format.
    pub fn is_available(&self) -> bool {
        match self {
            ExportFormat::Csv => true,
            ExportFormat::Spreadsheet => is_spreadsheet_export_available(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("CSV"),
            ExportFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = RunLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "spreadsheet" | "excel" => Ok(ExportFormat::Spreadsheet),
            other => Err(RunLogError::invalid_input("format")
                .with_reason(format!("unknown export format '{other}' (expected csv or xlsx)"))),
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Data rows written, not counting the header
    pub rows: usize,
}

/// True when spreadsheet export is compiled into this build.
pub fn is_spreadsheet_export_available() -> bool {
    cfg!(feature = "spreadsheet")
}

/// `runlog_runs_YYYYmmdd_HHMMSS.<ext>` stamped with the current local time.
pub fn default_export_file_name(format: ExportFormat) -> String {
    export_file_name_at(format, Zoned::now().datetime())
}

/// File name for an export taken at `at`.
pub fn export_file_name_at(format: ExportFormat, at: DateTime) -> String {
    format!(
        "runlog_runs_{}.{}",
        at.strftime("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Text cells of one run, in [`RUN_HEADERS`] order.
pub(crate) fn run_cells(run: &Run) -> [String; 11] {
    [
        run.id.to_string(),
        run.date.to_string(),
        format!("{:.2}", run.distance),
        run.duration.to_string(),
        run.avg_pace.to_string(),
        optional(run.avg_bpm),
        optional(run.max_bpm),
        optional(run.elevation_gain),
        optional(run.calories),
        run.workout_type.to_string(),
        run.notes
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| MISSING_VALUE.to_string()),
    ]
}

/// Text cells of every session of a plan, in [`PLAN_HEADERS`] order.
pub(crate) fn plan_cells(plan: &TrainingPlan) -> Vec<[String; 10]> {
    let text = |value: &Option<String>| {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    };

    plan.weeks
        .iter()
        .flat_map(|week| {
            week.sessions.iter().map(move |session| {
                [
                    week.week_number.to_string(),
                    text(&week.focus),
                    day_name(session.day_of_week).to_string(),
                    session.workout_type.clone(),
                    format!("{:.2}", session.distance),
                    session.duration.to_string(),
                    session.intensity.clone(),
                    text(&session.pace_target),
                    text(&session.hr_zone),
                    text(&session.details),
                ]
            })
        })
        .collect()
}

fn optional(value: Option<u32>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| v.to_string())
}

pub(crate) fn ensure_available(format: ExportFormat) -> Result<()> {
    if format.is_available() {
        Ok(())
    } else {
        Err(RunLogError::CapabilityUnavailable {
            capability: "Spreadsheet export".to_string(),
        })
    }
}

fn prepare_destination(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| RunLogError::file_system(parent, e))?;
        }
    }
    Ok(())
}

/// Writes `runs` to `destination` in the given format.
pub fn write_runs(format: ExportFormat, destination: &Path, runs: &[Run]) -> Result<ExportReport> {
    ensure_available(format)?;
    prepare_destination(destination)?;

    match format {
        ExportFormat::Csv => csv::write_runs(destination, runs)?,
        ExportFormat::Spreadsheet => {
            #[cfg(feature = "spreadsheet")]
            spreadsheet::write_runs(destination, runs)?;
        }
    }

    info!("Exported {} runs to {}", runs.len(), destination.display());
    Ok(ExportReport {
        path: destination.to_path_buf(),
        format,
        rows: runs.len(),
    })
}

/// Writes one row per session of `plan` to `destination`.
pub fn write_plan(
    format: ExportFormat,
    destination: &Path,
    plan: &TrainingPlan,
) -> Result<ExportReport> {
    ensure_available(format)?;
    prepare_destination(destination)?;

    match format {
        ExportFormat::Csv => csv::write_plan(destination, plan)?,
        ExportFormat::Spreadsheet => {
            #[cfg(feature = "spreadsheet")]
            spreadsheet::write_plan(destination, plan)?;
        }
    }

    let rows = plan.weeks.iter().map(|w| w.sessions.len()).sum();
    info!(
        "Exported plan '{}' ({rows} sessions) to {}",
        plan.name,
        destination.display()
    );
    Ok(ExportReport {
        path: destination.to_path_buf(),
        format,
        rows,
    })
}

impl Database {
    /// Exports runs, most recent first. `None` or an empty slice exports all.
    pub fn export_runs(
        &mut self,
        format: ExportFormat,
        destination: &Path,
        ids: Option<&[u64]>,
    ) -> Result<ExportReport> {
        ensure_available(format)?;
        let filter = RunFilter::by_ids(ids.unwrap_or_default());
        let runs = self.list_runs(Some(&filter))?;
        write_runs(format, destination, &runs)
    }

    /// Exports every session of plan `plan_id`.
    pub fn export_training_plan(
        &mut self,
        format: ExportFormat,
        destination: &Path,
        plan_id: u64,
    ) -> Result<ExportReport> {
        ensure_available(format)?;
        let plan = self
            .get_training_plan(plan_id)?
            .ok_or(RunLogError::PlanNotFound { id: plan_id })?;
        write_plan(format, destination, &plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pace, WorkoutType};

    #[test]
    fn test_file_name_is_stamped() {
        let at: DateTime = "2024-03-09T07:05:02".parse().expect("datetime");
        assert_eq!(
            export_file_name_at(ExportFormat::Csv, at),
            "runlog_runs_20240309_070502.csv"
        );
        assert_eq!(
            export_file_name_at(ExportFormat::Spreadsheet, at),
            "runlog_runs_20240309_070502.xlsx"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().expect("csv"), ExportFormat::Csv);
        assert_eq!(
            "xlsx".parse::<ExportFormat>().expect("xlsx"),
            ExportFormat::Spreadsheet
        );
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_missing_values_use_placeholder() {
        let run = Run {
            id: 3,
            date: "2024-01-05".parse().expect("date"),
            distance: 7.456,
            duration: 40,
            avg_pace: Pace::from_run(40, 7.456),
            avg_bpm: None,
            max_bpm: Some(0),
            elevation_gain: None,
            calories: None,
            workout_type: WorkoutType::Treadmill,
            notes: None,
            user_id: None,
        };

        let cells = run_cells(&run);
        assert_eq!(cells[2], "7.46");
        assert_eq!(cells[5], MISSING_VALUE);
        assert_eq!(cells[6], "0");
        assert_eq!(cells[10], MISSING_VALUE);
    }

    #[test]
    fn test_spreadsheet_flag_matches_build() {
        assert_eq!(
            ExportFormat::Spreadsheet.is_available(),
            cfg!(feature = "spreadsheet")
        );
        assert!(ExportFormat::Csv.is_available());
    }
}
