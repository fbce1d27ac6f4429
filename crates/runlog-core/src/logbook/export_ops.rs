//! Export and store maintenance operations for the Logbook.

use tokio::task;

use super::Logbook;
use crate::{
    db::{RecoveryAgent, RecoveryReport},
    error::{Result, RunLogError},
    export::{self, ExportFormat, ExportReport},
    params::{ExportPlan, ExportRuns},
};

impl Logbook {
    /// Whether spreadsheet export is available in this build.
    pub fn is_spreadsheet_export_available(&self) -> bool {
        export::is_spreadsheet_export_available()
    }

    /// Exports runs in `format`; an empty ID list exports every run.
    pub async fn export_runs(&self, format: ExportFormat, params: &ExportRuns) -> Result<ExportReport> {
        export::ensure_available(format)?;
        let ExportRuns { path, ids } = params.clone();
        self.with_database(move |db| db.export_runs(format, &path, Some(&ids)))
            .await
    }

    /// Exports runs as CSV.
    pub async fn export_to_csv(&self, params: &ExportRuns) -> Result<ExportReport> {
        self.export_runs(ExportFormat::Csv, params).await
    }

    /// Exports runs as a spreadsheet, or `CapabilityUnavailable`.
    pub async fn export_to_spreadsheet(&self, params: &ExportRuns) -> Result<ExportReport> {
        self.export_runs(ExportFormat::Spreadsheet, params).await
    }

    /// Exports one row per session of a training plan.
    pub async fn export_plan(&self, format: ExportFormat, params: &ExportPlan) -> Result<ExportReport> {
        export::ensure_available(format)?;
        let ExportPlan { plan_id, path } = params.clone();
        self.with_database(move |db| db.export_training_plan(format, &path, plan_id))
            .await
    }

    /// Exports a training plan as CSV.
    pub async fn export_plan_to_csv(&self, params: &ExportPlan) -> Result<ExportReport> {
        self.export_plan(ExportFormat::Csv, params).await
    }

    /// Exports a training plan as a spreadsheet, or `CapabilityUnavailable`.
    pub async fn export_plan_to_spreadsheet(&self, params: &ExportPlan) -> Result<ExportReport> {
        self.export_plan(ExportFormat::Spreadsheet, params).await
    }

    /// Probes the store and runs recovery if it is damaged.
    ///
    /// No connection is held while this runs.
    pub async fn check_store(&self) -> Result<RecoveryReport> {
        let agent = RecoveryAgent::new(&self.db_path);
        task::spawn_blocking(move || agent.attempt_recovery())
            .await
            .map_err(|e| RunLogError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}
