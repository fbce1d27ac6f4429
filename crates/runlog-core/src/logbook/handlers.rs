//! Logbook operations that return display wrappers for front ends.
//!
//! These sit one level above the plain operations: they bundle the lookups a
//! confirmation needs (the record before a delete, the old values before an
//! update) into the same unit of work, and hand back something that renders
//! directly as markdown.

use super::Logbook;
use crate::{
    display::{
        CreateResult, DeleteResult, MonthlyDistances, Runs, Settings, TrainingPlans,
        UpdateResult, WorkoutTypes,
    },
    error::{Result, RunLogError},
    models::{Run, RunFilter, TrainingPlan, TrainingSession, TrainingWeek, User},
    params::{
        CreatePlan, CreateRun, Id, RegisterUser, StatsQuery, UpdatePlan, UpdateRun,
        UpdateSession, UpdateWeek,
    },
};

/// Human-readable list of fields that differ between two versions of a run.
fn run_changes(before: &Run, after: &Run) -> Vec<String> {
    let mut changes = Vec::new();
    if before.date != after.date {
        changes.push(format!("Date: {} → {}", before.date, after.date));
    }
    if (before.distance - after.distance).abs() > f64::EPSILON {
        changes.push(format!(
            "Distance: {:.2} → {:.2} km",
            before.distance, after.distance
        ));
    }
    if before.duration != after.duration {
        changes.push(format!(
            "Duration: {} → {} min",
            before.duration, after.duration
        ));
    }
    if before.avg_pace != after.avg_pace {
        changes.push(format!("Pace: {} → {}", before.avg_pace, after.avg_pace));
    }
    if before.workout_type != after.workout_type {
        changes.push(format!(
            "Workout type: {} → {}",
            before.workout_type, after.workout_type
        ));
    }
    let optional_fields = [
        ("Avg BPM", before.avg_bpm, after.avg_bpm),
        ("Max BPM", before.max_bpm, after.max_bpm),
        ("Elevation gain", before.elevation_gain, after.elevation_gain),
        ("Calories", before.calories, after.calories),
    ];
    for (label, old, new) in optional_fields {
        if old != new {
            changes.push(format!("{label} updated"));
        }
    }
    if before.notes != after.notes {
        changes.push("Notes updated".to_string());
    }
    changes
}

fn plan_changes(before: &TrainingPlan, after: &TrainingPlan) -> Vec<String> {
    let mut changes = Vec::new();
    if before.name != after.name {
        changes.push(format!("Name: {} → {}", before.name, after.name));
    }
    if before.duration_weeks != after.duration_weeks {
        changes.push(format!(
            "Duration: {} → {} weeks",
            before.duration_weeks, after.duration_weeks
        ));
    }
    if before.goal != after.goal {
        changes.push("Goal updated".to_string());
    }
    if before.level != after.level {
        changes.push("Level updated".to_string());
    }
    if before.notes != after.notes {
        changes.push("Notes updated".to_string());
    }
    changes
}

impl Logbook {
    /// Records a run and returns it for confirmation.
    pub async fn record_run(&self, params: &CreateRun) -> Result<CreateResult<Run>> {
        let run = params.clone();
        self.with_database(move |db| {
            let id = db.add_run(&run)?;
            let stored = db.get_run(id)?.ok_or(RunLogError::RunNotFound { id })?;
            Ok(CreateResult::new(stored))
        })
        .await
    }

    /// Lists runs as a table, most recent first.
    pub async fn list_runs_table(&self, filter: Option<RunFilter>) -> Result<Runs> {
        Ok(Runs(self.list_runs(filter).await?))
    }

    /// Shows a single run.
    pub async fn show_run(&self, params: &Id) -> Result<Option<Run>> {
        self.get_run(params.id).await
    }

    /// Replaces a run and reports which fields changed.
    pub async fn edit_run(&self, params: &UpdateRun) -> Result<UpdateResult<Run>> {
        let UpdateRun { id, run } = params.clone();
        self.with_database(move |db| {
            let before = db.get_run(id)?.ok_or(RunLogError::RunNotFound { id })?;
            let after = db.update_run(id, &run)?;
            let changes = run_changes(&before, &after);
            Ok(UpdateResult::with_changes(after, changes))
        })
        .await
    }

    /// Deletes a run. `None` when there was nothing to delete.
    pub async fn remove_run(&self, params: &Id) -> Result<Option<DeleteResult<Run>>> {
        let id = params.id;
        self.with_database(move |db| match db.get_run(id)? {
            Some(run) => {
                db.delete_run(id)?;
                Ok(Some(DeleteResult::new(run)))
            }
            None => Ok(None),
        })
        .await
    }

    /// Workout type labels offered to the user.
    pub async fn workout_types(&self) -> Result<WorkoutTypes> {
        Ok(WorkoutTypes(self.list_workout_types().await?))
    }

    /// Monthly distance table for the requested (or current) year.
    pub async fn monthly_distance_table(&self, query: &StatsQuery) -> Result<MonthlyDistances> {
        let months = self.monthly_distance(query).await?;
        let year = query
            .year
            .unwrap_or_else(|| jiff::Zoned::now().year());
        Ok(MonthlyDistances { year, months })
    }

    /// Creates a plan and returns it with its generated weeks.
    pub async fn create_plan_result(&self, params: &CreatePlan) -> Result<CreateResult<TrainingPlan>> {
        Ok(CreateResult::new(self.create_training_plan(params).await?))
    }

    /// Lists plan headers.
    pub async fn list_plans_summary(&self) -> Result<TrainingPlans> {
        Ok(TrainingPlans(self.list_training_plans().await?))
    }

    /// Replaces a plan header and reports what changed.
    pub async fn edit_plan(&self, params: &UpdatePlan) -> Result<UpdateResult<TrainingPlan>> {
        let update = params.clone();
        self.with_database(move |db| {
            let id = update.id;
            let before = db
                .get_training_plan(id)?
                .ok_or(RunLogError::PlanNotFound { id })?;
            let after = db.update_training_plan(&update)?;
            let changes = plan_changes(&before, &after);
            Ok(UpdateResult::with_changes(after, changes))
        })
        .await
    }

    /// Deletes a plan and its weeks and sessions. `None` when it did not exist.
    pub async fn remove_plan(&self, params: &Id) -> Result<Option<DeleteResult<TrainingPlan>>> {
        let id = params.id;
        self.with_database(move |db| match db.get_training_plan(id)? {
            Some(plan) => {
                db.delete_training_plan(id)?;
                Ok(Some(DeleteResult::new(plan)))
            }
            None => Ok(None),
        })
        .await
    }

    pub async fn edit_week(&self, params: &UpdateWeek) -> Result<UpdateResult<TrainingWeek>> {
        Ok(UpdateResult::new(self.update_training_week(params).await?))
    }

    pub async fn edit_session(&self, params: &UpdateSession) -> Result<UpdateResult<TrainingSession>> {
        Ok(UpdateResult::new(self.update_training_session(params).await?))
    }

    pub async fn settings_list(&self) -> Result<Settings> {
        Ok(Settings(self.list_settings().await?))
    }

    /// Registers a user and returns it for confirmation.
    pub async fn register_user_result(&self, params: &RegisterUser) -> Result<CreateResult<User>> {
        Ok(CreateResult::new(self.register_user(params).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pace, WorkoutType};

    fn run(distance: f64, duration: u32) -> Run {
        Run {
            id: 1,
            date: "2024-02-01".parse().expect("date"),
            distance,
            duration,
            avg_pace: Pace::from_run(duration, distance),
            avg_bpm: None,
            max_bpm: None,
            elevation_gain: None,
            calories: None,
            workout_type: WorkoutType::StreetRun,
            notes: None,
            user_id: None,
        }
    }

    #[test]
    fn test_run_changes_reports_pace() {
        let changes = run_changes(&run(5.0, 30), &run(5.0, 25));
        assert_eq!(
            changes,
            vec!["Duration: 30 → 25 min".to_string(), "Pace: 6:00 → 5:00".to_string()]
        );
    }

    #[test]
    fn test_no_changes() {
        assert!(run_changes(&run(5.0, 30), &run(5.0, 30)).is_empty());
    }
}
