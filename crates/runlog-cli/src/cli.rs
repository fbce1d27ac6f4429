//! Command-line argument wrappers.
//!
//! Core parameter types carry no clap derives. Each command here has its own
//! argument struct with flags and help text, converted into the matching
//! [`runlog_core::params`] type with a `From` impl:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Logbook
//! ```

use std::path::PathBuf;

use clap::{Args, Subcommand};
use jiff::civil::Date;
use runlog_core::{params::*, ExportFormat, RunFilter, WorkoutType};

// ============================================================================
// Runs
// ============================================================================

/// Fields shared by `run add` and `run edit`.
#[derive(Args)]
pub struct RunFields {
    /// Date of the run (YYYY-MM-DD)
    pub date: String,
    /// Distance in kilometers
    pub distance: f64,
    /// Duration in whole minutes
    pub duration: u32,
    /// Average heart rate
    #[arg(long)]
    pub avg_bpm: Option<u32>,
    /// Maximum heart rate
    #[arg(long)]
    pub max_bpm: Option<u32>,
    /// Elevation gain in meters
    #[arg(long)]
    pub elevation_gain: Option<u32>,
    /// Calories burned
    #[arg(long)]
    pub calories: Option<u32>,
    /// Workout type, e.g. "Long Run" or any custom label (default: Street Run)
    #[arg(short = 't', long = "type")]
    pub workout_type: Option<String>,
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Owner of the run
    #[arg(long)]
    pub user_id: Option<u64>,
}

impl From<RunFields> for CreateRun {
    fn from(val: RunFields) -> Self {
        CreateRun {
            date: val.date,
            distance: val.distance,
            duration: val.duration,
            avg_bpm: val.avg_bpm,
            max_bpm: val.max_bpm,
            elevation_gain: val.elevation_gain,
            calories: val.calories,
            workout_type: val.workout_type,
            notes: val.notes,
            user_id: val.user_id,
        }
    }
}

/// Replace every field of an existing run
#[derive(Args)]
pub struct EditRunArgs {
    /// ID of the run to replace
    pub id: u64,
    #[command(flatten)]
    pub run: RunFields,
}

impl From<EditRunArgs> for UpdateRun {
    fn from(val: EditRunArgs) -> Self {
        UpdateRun {
            id: val.id,
            run: val.run.into(),
        }
    }
}

/// List runs, most recent first
#[derive(Args)]
pub struct ListRunsArgs {
    /// Only runs of this workout type (case-insensitive)
    #[arg(short = 't', long = "type")]
    pub workout_type: Option<String>,
    /// Only runs on or after this date
    #[arg(long)]
    pub from: Option<Date>,
    /// Only runs on or before this date
    #[arg(long)]
    pub to: Option<Date>,
    /// Only runs of this user
    #[arg(long)]
    pub user_id: Option<u64>,
}

impl From<ListRunsArgs> for RunFilter {
    fn from(val: ListRunsArgs) -> Self {
        RunFilter {
            ids: None,
            user_id: val.user_id,
            workout_type: val.workout_type.as_deref().map(WorkoutType::from_label),
            date_from: val.from,
            date_to: val.to,
        }
    }
}

/// Select a record by ID
#[derive(Args)]
pub struct IdArgs {
    /// ID of the record
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Totals, bests and monthly distance
#[derive(Args)]
pub struct StatsArgs {
    /// Calendar year to report on (all years when omitted; monthly view
    /// defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i16>,
    /// Only count this user's runs
    #[arg(long)]
    pub user_id: Option<u64>,
    /// Show distance per month instead of totals
    #[arg(short, long)]
    pub monthly: bool,
}

impl From<&StatsArgs> for StatsQuery {
    fn from(val: &StatsArgs) -> Self {
        StatsQuery {
            user_id: val.user_id,
            year: val.year,
        }
    }
}

#[derive(Subcommand)]
pub enum RunCommands {
    /// Record a run
    #[command(alias = "a")]
    Add(RunFields),
    /// List runs, most recent first
    #[command(aliases = ["l", "ls"])]
    List(ListRunsArgs),
    /// Show one run
    #[command(alias = "s")]
    Show(IdArgs),
    /// Replace every field of a run
    #[command(alias = "e")]
    Edit(EditRunArgs),
    /// Delete a run (deleting a missing run is not an error)
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// List workout types
    Types,
    /// Show statistics
    Stats(StatsArgs),
}

// ============================================================================
// Training plans
// ============================================================================

/// Header fields shared by `plan create` and `plan edit`.
#[derive(Args)]
pub struct PlanFields {
    /// Name of the plan
    pub name: String,
    /// Number of weeks; every week starts as seven rest days
    #[arg(short, long)]
    pub weeks: u32,
    /// What the plan builds towards
    #[arg(short, long)]
    pub goal: Option<String>,
    /// Target level, e.g. beginner
    #[arg(short, long)]
    pub level: Option<String>,
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<PlanFields> for CreatePlan {
    fn from(val: PlanFields) -> Self {
        CreatePlan {
            name: val.name,
            goal: val.goal,
            duration_weeks: val.weeks,
            level: val.level,
            notes: val.notes,
        }
    }
}

/// Replace a plan's header; changing --weeks adds or drops trailing weeks
#[derive(Args)]
pub struct EditPlanArgs {
    /// ID of the plan
    pub id: u64,
    #[command(flatten)]
    pub plan: PlanFields,
}

impl From<EditPlanArgs> for UpdatePlan {
    fn from(val: EditPlanArgs) -> Self {
        UpdatePlan {
            id: val.id,
            plan: val.plan.into(),
        }
    }
}

/// Replace a week's focus, distance and notes
#[derive(Args)]
pub struct EditWeekArgs {
    /// ID of the week
    pub id: u64,
    /// What the week concentrates on
    #[arg(short, long)]
    pub focus: Option<String>,
    /// Planned distance for the week in kilometers
    #[arg(short, long, default_value_t = 0.0)]
    pub distance: f64,
    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl From<EditWeekArgs> for UpdateWeek {
    fn from(val: EditWeekArgs) -> Self {
        UpdateWeek {
            id: val.id,
            focus: val.focus,
            total_distance: val.distance,
            notes: val.notes,
        }
    }
}

/// Replace a session's planned workout
#[derive(Args)]
pub struct EditSessionArgs {
    /// ID of the session
    pub id: u64,
    /// Workout type, e.g. Interval or Rest
    pub workout_type: String,
    /// Planned distance in kilometers
    #[arg(short, long, default_value_t = 0.0)]
    pub distance: f64,
    /// Planned duration in minutes
    #[arg(short = 'm', long, default_value_t = 0)]
    pub duration: u32,
    /// Effort level
    #[arg(short, long, default_value = "Moderate")]
    pub intensity: String,
    /// Target pace, e.g. 5:15
    #[arg(short, long)]
    pub pace: Option<String>,
    /// Heart rate zone
    #[arg(long)]
    pub hr_zone: Option<String>,
    /// Workout details
    #[arg(long)]
    pub details: Option<String>,
}

impl From<EditSessionArgs> for UpdateSession {
    fn from(val: EditSessionArgs) -> Self {
        UpdateSession {
            id: val.id,
            workout_type: val.workout_type,
            distance: val.distance,
            duration: val.duration,
            intensity: val.intensity,
            pace_target: val.pace,
            hr_zone: val.hr_zone,
            details: val.details,
        }
    }
}

/// Export every session of a plan
#[derive(Args)]
pub struct ExportPlanArgs {
    /// ID of the plan
    pub id: u64,
    /// Output format: csv or xlsx
    #[arg(short, long, default_value = "csv")]
    pub format: ExportFormat,
    /// Destination file (default: runlog_plan_<ID>.<ext> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan
    #[command(alias = "c")]
    Create(PlanFields),
    /// List plans, most recently changed first
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a plan with all weeks and sessions
    #[command(alias = "s")]
    Show(IdArgs),
    /// Replace a plan's header
    #[command(alias = "e")]
    Edit(EditPlanArgs),
    /// Delete a plan with its weeks and sessions
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Edit a training week
    #[command(alias = "w")]
    Week(EditWeekArgs),
    /// Edit a training session
    #[command(alias = "ss")]
    Session(EditSessionArgs),
    /// Export a plan to a file
    #[command(alias = "x")]
    Export(ExportPlanArgs),
}

// ============================================================================
// Export, settings and users
// ============================================================================

/// Choose runs and destination for an export
#[derive(Args)]
pub struct ExportRunsArgs {
    /// Destination file (default: a timestamped file in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Runs to export as a comma-separated list of IDs (default: all)
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<u64>,
}

impl ExportRunsArgs {
    /// Converts to core parameters, filling in the default file name.
    pub fn into_params(self, format: ExportFormat) -> ExportRuns {
        ExportRuns {
            path: self
                .output
                .unwrap_or_else(|| PathBuf::from(runlog_core::export::default_export_file_name(format))),
            ids: self.ids,
        }
    }
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export runs as CSV
    Csv(ExportRunsArgs),
    /// Export runs as an Excel workbook
    #[command(alias = "excel")]
    Xlsx(ExportRunsArgs),
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show one setting
    Get {
        /// Setting name
        key: String,
    },
    /// Store a setting
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Register a local user
#[derive(Args)]
pub struct RegisterArgs {
    /// Login name, unique regardless of case
    pub username: String,
    /// Password
    #[arg(short, long)]
    pub password: String,
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

impl From<RegisterArgs> for RegisterUser {
    fn from(val: RegisterArgs) -> Self {
        RegisterUser {
            username: val.username,
            password: val.password,
            name: val.name,
            email: val.email,
        }
    }
}

/// Check a username and password
#[derive(Args)]
pub struct LoginArgs {
    /// Login name
    pub username: String,
    /// Password
    #[arg(short, long)]
    pub password: String,
}

impl From<LoginArgs> for Credentials {
    fn from(val: LoginArgs) -> Self {
        Credentials {
            username: val.username,
            password: val.password,
        }
    }
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user
    Register(RegisterArgs),
    /// Verify credentials
    Login(LoginArgs),
}
