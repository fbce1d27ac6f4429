//! Command execution: each subcommand maps to one logbook call and one
//! rendered result.

use std::path::PathBuf;

use anyhow::{bail, Result};
use log::debug;
use runlog_core::{
    display::OperationStatus,
    params::{ExportPlan, Id, SetSetting, StatsQuery},
    ExportFormat, Logbook, RunFilter, RunLogError,
};
use serde_json::json;

use crate::{
    cli::{
        ExportCommands, ExportPlanArgs, PlanCommands, RunCommands, SettingsCommands, StatsArgs,
        UserCommands,
    },
    renderer::Output,
};

pub struct Cli {
    logbook: Logbook,
    output: Output,
}

impl Cli {
    pub fn new(logbook: Logbook, output: Output) -> Self {
        Self { logbook, output }
    }

    pub async fn handle_run_command(&self, command: RunCommands) -> Result<()> {
        match command {
            RunCommands::Add(args) => {
                let result = self.logbook.record_run(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            RunCommands::List(args) => self.list_runs(Some(args.into())).await,
            RunCommands::Show(args) => {
                let id = args.id;
                match self.logbook.show_run(&args.into()).await? {
                    Some(run) => self.output.emit(&run, &run),
                    None => Err(RunLogError::RunNotFound { id }.into()),
                }
            }
            RunCommands::Edit(args) => {
                let result = self.logbook.edit_run(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            RunCommands::Delete(args) => {
                let id = args.id;
                match self.logbook.remove_run(&args.into()).await? {
                    Some(result) => self
                        .output
                        .emit(&result, &json!({ "id": id, "deleted": true })),
                    None => self.output.emit(
                        &OperationStatus::notice(format!("Run {id} not found, nothing deleted")),
                        &json!({ "id": id, "deleted": false }),
                    ),
                }
            }
            RunCommands::Types => {
                let types = self.logbook.workout_types().await?;
                self.output.emit(&types, &types.0)
            }
            RunCommands::Stats(args) => self.show_stats(&args).await,
        }
    }

    /// Lists runs; also what runs when no subcommand is given.
    pub async fn list_runs(&self, filter: Option<RunFilter>) -> Result<()> {
        let runs = self.logbook.list_runs_table(filter).await?;
        self.output.emit(&runs, &runs.0)
    }

    async fn show_stats(&self, args: &StatsArgs) -> Result<()> {
        let query = StatsQuery::from(args);
        if args.monthly {
            let months = self.logbook.monthly_distance_table(&query).await?;
            self.output.emit(&months, &months.months)
        } else {
            let stats = self.logbook.run_statistics(&query).await?;
            self.output.emit(&stats, &stats)
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let result = self.logbook.create_plan_result(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            PlanCommands::List => {
                let plans = self.logbook.list_plans_summary().await?;
                self.output.emit(&plans, &plans.0)
            }
            PlanCommands::Show(args) => {
                let id = args.id;
                match self.logbook.get_training_plan(&args.into()).await? {
                    Some(plan) => self.output.emit(&plan, &plan),
                    None => Err(RunLogError::PlanNotFound { id }.into()),
                }
            }
            PlanCommands::Edit(args) => {
                let result = self.logbook.edit_plan(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            PlanCommands::Delete(args) => {
                let id = args.id;
                match self.logbook.remove_plan(&Id::from(args)).await? {
                    Some(result) => self
                        .output
                        .emit(&result, &json!({ "id": id, "deleted": true })),
                    None => self.output.emit(
                        &OperationStatus::notice(format!(
                            "Training plan {id} not found, nothing deleted"
                        )),
                        &json!({ "id": id, "deleted": false }),
                    ),
                }
            }
            PlanCommands::Week(args) => {
                let result = self.logbook.edit_week(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            PlanCommands::Session(args) => {
                let result = self.logbook.edit_session(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            PlanCommands::Export(args) => self.export_plan(args).await,
        }
    }

    async fn export_plan(&self, args: ExportPlanArgs) -> Result<()> {
        let ExportPlanArgs { id, format, output } = args;
        let path = output.unwrap_or_else(|| {
            PathBuf::from(format!("runlog_plan_{id}.{}", format.extension()))
        });
        let report = self
            .logbook
            .export_plan(format, &ExportPlan { plan_id: id, path })
            .await?;
        self.output.emit(&report, &report)
    }

    pub async fn handle_export_command(&self, command: ExportCommands) -> Result<()> {
        let (format, args) = match command {
            ExportCommands::Csv(args) => (ExportFormat::Csv, args),
            ExportCommands::Xlsx(args) => (ExportFormat::Spreadsheet, args),
        };
        let params = args.into_params(format);
        debug!("Exporting {} runs to {}", format, params.path.display());

        let report = self.logbook.export_runs(format, &params).await?;
        self.output.emit(&report, &report)
    }

    pub async fn handle_settings_command(&self, command: SettingsCommands) -> Result<()> {
        match command {
            SettingsCommands::Get { key } => match self.logbook.get_setting(&key).await? {
                Some(value) => self.output.emit(
                    &format!("{key} = {value}\n"),
                    &json!({ "key": key, "value": value }),
                ),
                None => self.output.emit(
                    &OperationStatus::notice(format!("Setting '{key}' is not set")),
                    &json!({ "key": key, "value": null }),
                ),
            },
            SettingsCommands::Set { key, value } => {
                let setting = self.logbook.set_setting(&SetSetting { key, value }).await?;
                self.output.emit(
                    &OperationStatus::success(format!(
                        "Setting '{}' saved as '{}'",
                        setting.key, setting.value
                    )),
                    &setting,
                )
            }
            SettingsCommands::List => {
                let settings = self.logbook.settings_list().await?;
                self.output.emit(&settings, &settings.0)
            }
        }
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Register(args) => {
                let result = self.logbook.register_user_result(&args.into()).await?;
                self.output.emit(&result, &result.resource)
            }
            UserCommands::Login(args) => match self.logbook.authenticate(&args.into()).await? {
                Some(user) => self.output.emit(
                    &OperationStatus::success(format!("Authenticated as {}", user.username)),
                    &user,
                ),
                None => bail!("Invalid username or password"),
            },
        }
    }

    pub async fn check_store(&self) -> Result<()> {
        let report = self.logbook.check_store().await?;
        if !self.output.is_json() {
            self.output.emit(
                &OperationStatus::success(format!(
                    "Store at {} checked",
                    self.logbook.database_path().display()
                )),
                &(),
            )?;
        }
        self.output.emit(&format!("{report}\n"), &report)
    }
}
