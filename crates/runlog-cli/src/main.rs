//! runlog command-line front end.

mod args;
mod cli;
mod commands;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use commands::Cli;
use log::info;
use renderer::{Output, TerminalRenderer};
use runlog_core::LogbookBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        json,
        command,
    } = Args::parse();

    let logbook = LogbookBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to open the run log")?;

    info!("runlog started with store {}", logbook.database_path().display());

    let cli = Cli::new(logbook, Output::new(TerminalRenderer::new(!no_color), json));

    match command {
        Some(Run { command }) => cli.handle_run_command(command).await,
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Export { command }) => cli.handle_export_command(command).await,
        Some(Settings { command }) => cli.handle_settings_command(command).await,
        Some(User { command }) => cli.handle_user_command(command).await,
        Some(Check) => cli.check_store().await,
        None => cli.list_runs(None).await,
    }
}
