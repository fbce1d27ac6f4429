//! Run operations for the Logbook.

use jiff::Zoned;

use super::Logbook;
use crate::{
    error::Result,
    models::{MonthlyDistance, Run, RunFilter, RunStatistics},
    params::{CreateRun, Id, StatsQuery, UpdateRun},
};

impl Logbook {
    /// Records a run and returns its new ID. The pace is derived, never taken
    /// from the caller.
    pub async fn add_run(&self, params: &CreateRun) -> Result<u64> {
        let run = params.clone();
        self.with_database(move |db| db.add_run(&run)).await
    }

    /// Retrieves a run by its ID.
    pub async fn get_run(&self, id: u64) -> Result<Option<Run>> {
        self.with_database(move |db| db.get_run(id)).await
    }

    /// Lists runs, most recent first.
    pub async fn list_runs(&self, filter: Option<RunFilter>) -> Result<Vec<Run>> {
        self.with_database(move |db| db.list_runs(filter.as_ref()))
            .await
    }

    /// Replaces every field of a run. Fails with `RunNotFound` for unknown IDs.
    pub async fn update_run(&self, params: &UpdateRun) -> Result<Run> {
        let id = params.id;
        let run = params.run.clone();
        self.with_database(move |db| db.update_run(id, &run)).await
    }

    /// Deletes a run; `false` when it did not exist.
    pub async fn delete_run(&self, params: &Id) -> Result<bool> {
        let id = params.id;
        self.with_database(move |db| db.delete_run(id)).await
    }

    /// Built-in workout type labels plus custom ones already in use.
    pub async fn list_workout_types(&self) -> Result<Vec<String>> {
        self.with_database(|db| db.list_workout_types()).await
    }

    /// Totals and bests for the runs in scope.
    pub async fn run_statistics(&self, query: &StatsQuery) -> Result<RunStatistics> {
        let query = query.clone();
        self.with_database(move |db| db.run_statistics(&query))
            .await
    }

    /// Distance per month for `query.year` (the current year when unset).
    pub async fn monthly_distance(&self, query: &StatsQuery) -> Result<Vec<MonthlyDistance>> {
        let user_id = query.user_id;
        let year = query.year.unwrap_or_else(|| Zoned::now().year());
        self.with_database(move |db| db.monthly_distance(user_id, year))
            .await
    }
}
