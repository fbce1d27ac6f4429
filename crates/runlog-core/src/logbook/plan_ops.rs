//! Training plan operations for the Logbook.

use super::Logbook;
use crate::{
    error::Result,
    models::{TrainingPlan, TrainingSession, TrainingWeek},
    params::{CreatePlan, Id, UpdatePlan, UpdateSession, UpdateWeek},
};

impl Logbook {
    /// Creates a plan with its weeks of rest days in one transaction.
    pub async fn create_training_plan(&self, params: &CreatePlan) -> Result<TrainingPlan> {
        let plan = params.clone();
        self.with_database(move |db| db.create_training_plan(&plan))
            .await
    }

    /// Retrieves a plan with weeks and sessions eagerly loaded.
    pub async fn get_training_plan(&self, params: &Id) -> Result<Option<TrainingPlan>> {
        let id = params.id;
        self.with_database(move |db| db.get_training_plan(id))
            .await
    }

    /// Lists plan headers, most recently changed first.
    pub async fn list_training_plans(&self) -> Result<Vec<TrainingPlan>> {
        self.with_database(|db| db.list_training_plans()).await
    }

    /// Replaces a plan's header and resizes its weeks to match.
    pub async fn update_training_plan(&self, params: &UpdatePlan) -> Result<TrainingPlan> {
        let update = params.clone();
        self.with_database(move |db| db.update_training_plan(&update))
            .await
    }

    /// Deletes a plan and everything under it.
    pub async fn delete_training_plan(&self, params: &Id) -> Result<bool> {
        let id = params.id;
        self.with_database(move |db| db.delete_training_plan(id))
            .await
    }

    /// Replaces a week's focus, distance and notes.
    pub async fn update_training_week(&self, params: &UpdateWeek) -> Result<TrainingWeek> {
        let update = params.clone();
        self.with_database(move |db| db.update_training_week(&update))
            .await
    }

    /// Replaces a session's planned workout.
    pub async fn update_training_session(&self, params: &UpdateSession) -> Result<TrainingSession> {
        let update = params.clone();
        self.with_database(move |db| db.update_training_session(&update))
            .await
    }
}
