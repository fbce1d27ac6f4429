//! Run CRUD operations and queries.

use rusqlite::{params, OptionalExtension, Row, ToSql};

use super::parse_column;
use crate::{
    error::{DatabaseResultExt, Result, RunLogError},
    models::{Pace, Run, RunFilter, WorkoutType},
    params::CreateRun,
};

const RUN_COLUMNS: &str = "id, date, distance, duration, avg_pace, avg_bpm, max_bpm, \
                           elevation_gain, calories, workout_type, notes, user_id";
const INSERT_RUN_SQL: &str = "INSERT INTO runs (date, distance, duration, avg_pace, avg_bpm, max_bpm, elevation_gain, calories, workout_type, notes, user_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_RUN_SQL: &str = "UPDATE runs SET date = ?1, distance = ?2, duration = ?3, avg_pace = ?4, avg_bpm = ?5, max_bpm = ?6, elevation_gain = ?7, calories = ?8, workout_type = ?9, notes = ?10, user_id = ?11 WHERE id = ?12";
const DELETE_RUN_SQL: &str = "DELETE FROM runs WHERE id = ?1";
const DISTINCT_WORKOUT_TYPES_SQL: &str =
    "SELECT DISTINCT workout_type FROM runs WHERE workout_type IS NOT NULL AND TRIM(workout_type) <> '' ORDER BY workout_type";

/// A validated run ready to bind, with its pace already derived.
struct RunRecord {
    date: String,
    distance: f64,
    duration: u32,
    avg_pace: String,
    avg_bpm: Option<u32>,
    max_bpm: Option<u32>,
    elevation_gain: Option<u32>,
    calories: Option<u32>,
    workout_type: String,
    notes: Option<String>,
    user_id: Option<i64>,
}

impl RunRecord {
    fn from_params(run: &CreateRun) -> Result<Self> {
        let date = run.validate()?;
        let workout_type = run
            .workout_type
            .as_deref()
            .map(WorkoutType::from_label)
            .unwrap_or_default();

        Ok(Self {
            date: date.to_string(),
            distance: run.distance,
            duration: run.duration,
            avg_pace: Pace::from_run(run.duration, run.distance).to_string(),
            avg_bpm: run.avg_bpm,
            max_bpm: run.max_bpm,
            elevation_gain: run.elevation_gain,
            calories: run.calories,
            workout_type: workout_type.label().to_string(),
            notes: run.notes.clone().filter(|n| !n.trim().is_empty()),
            user_id: run.user_id.map(|id| id as i64),
        })
    }

    fn bindings(&self) -> [&dyn ToSql; 11] {
        [
            &self.date,
            &self.distance,
            &self.duration,
            &self.avg_pace,
            &self.avg_bpm,
            &self.max_bpm,
            &self.elevation_gain,
            &self.calories,
            &self.workout_type,
            &self.notes,
            &self.user_id,
        ]
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<Run> {
    let distance = row.get::<_, Option<f64>>("distance")?.unwrap_or(0.0);
    let duration = row.get::<_, Option<u32>>("duration")?.unwrap_or(0);
    // Rows written by older builds may carry a pace in another format.
    let avg_pace = row
        .get::<_, Option<String>>("avg_pace")?
        .and_then(|text| text.parse::<Pace>().ok())
        .unwrap_or_else(|| Pace::from_run(duration, distance));
    let workout_type = row
        .get::<_, Option<String>>("workout_type")?
        .map(WorkoutType::from)
        .unwrap_or_default();

    Ok(Run {
        id: row.get::<_, i64>("id")? as u64,
        date: parse_column(row, "date")?,
        distance,
        duration,
        avg_pace,
        avg_bpm: row.get("avg_bpm")?,
        max_bpm: row.get("max_bpm")?,
        elevation_gain: row.get("elevation_gain")?,
        calories: row.get("calories")?,
        workout_type,
        notes: row.get("notes")?,
        user_id: row.get::<_, Option<i64>>("user_id")?.map(|id| id as u64),
    })
}

impl super::Database {
    /// Validates and inserts a run, deriving its pace. Returns the new ID.
    pub fn add_run(&mut self, run: &CreateRun) -> Result<u64> {
        let record = RunRecord::from_params(run)?;

        self.write(|conn| {
            conn.execute(INSERT_RUN_SQL, &record.bindings()[..])
                .db_context("Failed to insert run")?;
            Ok(conn.last_insert_rowid() as u64)
        })
    }

    /// Retrieves a run by its ID.
    pub fn get_run(&mut self, id: u64) -> Result<Option<Run>> {
        let sql = format!("SELECT {RUN_COLUMNS} FROM runs WHERE id = ?1");
        self.connection()?
            .query_row(&sql, params![id as i64], run_from_row)
            .optional()
            .db_context("Failed to query run")
    }

    /// Lists runs, most recent date first (ties broken by newest ID).
    pub fn list_runs(&mut self, filter: Option<&RunFilter>) -> Result<Vec<Run>> {
        let mut query = format!("SELECT {RUN_COLUMNS} FROM runs");

        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(ids) = f.ids.as_ref().filter(|ids| !ids.is_empty()) {
                let placeholders = vec!["?"; ids.len()].join(", ");
                conditions.push(format!("id IN ({placeholders})"));
                for id in ids {
                    params_vec.push(Box::new(*id as i64));
                }
            }

            if let Some(user_id) = f.user_id {
                conditions.push("user_id = ?".to_string());
                params_vec.push(Box::new(user_id as i64));
            }

            if let Some(ref workout_type) = f.workout_type {
                conditions.push("workout_type = ? COLLATE NOCASE".to_string());
                params_vec.push(Box::new(workout_type.label().to_string()));
            }

            if let Some(from) = f.date_from {
                conditions.push("date >= ?".to_string());
                params_vec.push(Box::new(from.to_string()));
            }

            if let Some(to) = f.date_to {
                conditions.push("date <= ?".to_string());
                params_vec.push(Box::new(to.to_string()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY date DESC, id DESC");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&query).db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();

        let runs = stmt
            .query_map(&params_refs[..], run_from_row)
            .db_context("Failed to query runs")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect runs")?;

        Ok(runs)
    }

    /// Replaces every field of run `id`, recomputing its pace.
    pub fn update_run(&mut self, id: u64, run: &CreateRun) -> Result<Run> {
        let record = RunRecord::from_params(run)?;

        let id_param = id as i64;
        self.write(|conn| {
            let mut bindings = record.bindings().to_vec();
            bindings.push(&id_param);

            let affected = conn
                .execute(UPDATE_RUN_SQL, &bindings[..])
                .db_context("Failed to update run")?;
            if affected == 0 {
                return Err(RunLogError::RunNotFound { id });
            }
            Ok(())
        })?;

        self.get_run(id)?.ok_or(RunLogError::RunNotFound { id })
    }

    /// Deletes run `id`. Returns `false` when there was no such run.
    pub fn delete_run(&mut self, id: u64) -> Result<bool> {
        self.write(|conn| {
            let affected = conn
                .execute(DELETE_RUN_SQL, params![id as i64])
                .db_context("Failed to delete run")?;
            Ok(affected > 0)
        })
    }

    /// Built-in workout type labels followed by any custom labels in use.
    pub fn list_workout_types(&mut self) -> Result<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(DISTINCT_WORKOUT_TYPES_SQL)
            .db_context("Failed to prepare query")?;
        let stored = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .db_context("Failed to query workout types")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect workout types")?;

        let mut labels: Vec<String> = WorkoutType::KNOWN
            .iter()
            .map(|kind| kind.label().to_string())
            .collect();
        for label in stored {
            let kind = WorkoutType::from_label(&label);
            if kind.is_custom() && !labels.iter().any(|l| l.eq_ignore_ascii_case(kind.label())) {
                labels.push(kind.label().to_string());
            }
        }
        Ok(labels)
    }
}
