use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    ExportCommands, PlanCommands, RunCommands, SettingsCommands, UserCommands,
};

/// Running log with training plans
///
/// Records runs (pace is always derived from distance and duration), manages
/// multi-week training plans, and exports both to CSV or spreadsheets. The
/// store is a single SQLite file that is checked, and if needed backed up and
/// repaired, every time it is opened.
#[derive(Parser)]
#[command(version, about, name = "runlog")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/runlog/runlog.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one, recent runs are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Record and browse runs
    #[command(alias = "r")]
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
    /// Manage training plans, weeks and sessions
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Export runs to a file
    #[command(alias = "x")]
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Read and write application settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Manage local users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Check the store and recover it if damaged
    Check,
}
