//! Training plan, week and session operations.
//!
//! A plan owns exactly `duration_weeks` weeks and every week owns one session
//! per weekday. Removing a plan removes its weeks and sessions through
//! `ON DELETE CASCADE`. Any write below a plan touches the plan's
//! `updated_at`.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_column, timestamp_text};
use crate::{
    error::{DatabaseResultExt, Result, RunLogError},
    models::{
        plan::{DAYS_PER_WEEK, REST_INTENSITY, REST_WORKOUT},
        TrainingPlan, TrainingSession, TrainingWeek,
    },
    params::{CreatePlan, UpdatePlan, UpdateSession, UpdateWeek},
};

const PLAN_COLUMNS: &str = "id, name, goal, duration_weeks, level, notes, created_at, updated_at";
const WEEK_COLUMNS: &str = "id, plan_id, week_number, focus, total_distance, notes";
const SESSION_COLUMNS: &str =
    "id, week_id, day_of_week, workout_type, distance, duration, intensity, pace_target, hr_zone, details";

const INSERT_PLAN_SQL: &str = "INSERT INTO training_plans (name, goal, duration_weeks, level, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const INSERT_WEEK_SQL: &str =
    "INSERT INTO training_weeks (plan_id, week_number, focus, total_distance) VALUES (?1, ?2, ?3, 0)";
const INSERT_SESSION_SQL: &str = "INSERT INTO training_sessions (week_id, day_of_week, workout_type, distance, duration, intensity) VALUES (?1, ?2, ?3, 0, 0, ?4)";
const UPDATE_PLAN_SQL: &str = "UPDATE training_plans SET name = ?1, goal = ?2, duration_weeks = ?3, level = ?4, notes = ?5, updated_at = ?6 WHERE id = ?7";
const UPDATE_WEEK_SQL: &str =
    "UPDATE training_weeks SET focus = ?1, total_distance = ?2, notes = ?3 WHERE id = ?4";
const UPDATE_SESSION_SQL: &str = "UPDATE training_sessions SET workout_type = ?1, distance = ?2, duration = ?3, intensity = ?4, pace_target = ?5, hr_zone = ?6, details = ?7 WHERE id = ?8";
const TOUCH_PLAN_SQL: &str = "UPDATE training_plans SET updated_at = ?1 WHERE id = ?2";
const COUNT_WEEKS_SQL: &str = "SELECT COUNT(*) FROM training_weeks WHERE plan_id = ?1";
const DELETE_TRAILING_WEEKS_SQL: &str =
    "DELETE FROM training_weeks WHERE plan_id = ?1 AND week_number > ?2";
const DELETE_PLAN_SQL: &str = "DELETE FROM training_plans WHERE id = ?1";
const WEEK_PLAN_ID_SQL: &str = "SELECT plan_id FROM training_weeks WHERE id = ?1";
const SESSION_PLAN_ID_SQL: &str = "SELECT w.plan_id FROM training_sessions s JOIN training_weeks w ON w.id = s.week_id WHERE s.id = ?1";

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<TrainingPlan> {
    Ok(TrainingPlan {
        id: row.get::<_, i64>("id")? as u64,
        name: row.get("name")?,
        goal: row.get("goal")?,
        duration_weeks: row.get("duration_weeks")?,
        level: row.get("level")?,
        notes: row.get("notes")?,
        created_at: parse_column::<Timestamp>(row, "created_at")?,
        updated_at: parse_column::<Timestamp>(row, "updated_at")?,
        weeks: Vec::new(),
    })
}

fn week_from_row(row: &Row<'_>) -> rusqlite::Result<TrainingWeek> {
    Ok(TrainingWeek {
        id: row.get::<_, i64>("id")? as u64,
        plan_id: row.get::<_, i64>("plan_id")? as u64,
        week_number: row.get("week_number")?,
        focus: row.get("focus")?,
        total_distance: row.get("total_distance")?,
        notes: row.get("notes")?,
        sessions: Vec::new(),
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<TrainingSession> {
    Ok(TrainingSession {
        id: row.get::<_, i64>("id")? as u64,
        week_id: row.get::<_, i64>("week_id")? as u64,
        day_of_week: row.get("day_of_week")?,
        workout_type: row.get("workout_type")?,
        distance: row.get("distance")?,
        duration: row.get("duration")?,
        intensity: row.get("intensity")?,
        pace_target: row.get("pace_target")?,
        hr_zone: row.get("hr_zone")?,
        details: row.get("details")?,
    })
}

/// Appends weeks `first..=last` to a plan, each with a full set of rest days.
fn insert_rest_weeks(conn: &Connection, plan_id: u64, first: u32, last: u32) -> Result<()> {
    let mut insert_week = conn
        .prepare_cached(INSERT_WEEK_SQL)
        .db_context("Failed to prepare week insert")?;
    let mut insert_session = conn
        .prepare_cached(INSERT_SESSION_SQL)
        .db_context("Failed to prepare session insert")?;

    for week_number in first..=last {
        insert_week
            .execute(params![
                plan_id as i64,
                week_number,
                format!("Week {week_number}")
            ])
            .db_context("Failed to insert training week")?;
        let week_id = conn.last_insert_rowid();

        for day in 0..DAYS_PER_WEEK {
            insert_session
                .execute(params![week_id, day, REST_WORKOUT, REST_INTENSITY])
                .db_context("Failed to insert training session")?;
        }
    }
    Ok(())
}

fn touch_plan(conn: &Connection, plan_id: u64, now: &Timestamp) -> Result<()> {
    conn.execute(TOUCH_PLAN_SQL, params![timestamp_text(now), plan_id as i64])
        .db_context("Failed to update plan timestamp")?;
    Ok(())
}

fn load_sessions(conn: &Connection, week_id: u64) -> Result<Vec<TrainingSession>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE week_id = ?1 ORDER BY day_of_week"
    );
    let mut stmt = conn.prepare(&sql).db_context("Failed to prepare query")?;
    let sessions = stmt
        .query_map(params![week_id as i64], session_from_row)
        .db_context("Failed to query sessions")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to collect sessions")?;
    Ok(sessions)
}

fn load_weeks(conn: &Connection, plan_id: u64) -> Result<Vec<TrainingWeek>> {
    let sql = format!(
        "SELECT {WEEK_COLUMNS} FROM training_weeks WHERE plan_id = ?1 ORDER BY week_number"
    );
    let mut stmt = conn.prepare(&sql).db_context("Failed to prepare query")?;
    let mut weeks = stmt
        .query_map(params![plan_id as i64], week_from_row)
        .db_context("Failed to query weeks")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to collect weeks")?;

    for week in &mut weeks {
        week.sessions = load_sessions(conn, week.id)?;
    }
    Ok(weeks)
}

fn load_plan(conn: &Connection, id: u64) -> Result<Option<TrainingPlan>> {
    let sql = format!("SELECT {PLAN_COLUMNS} FROM training_plans WHERE id = ?1");
    let mut plan = conn
        .query_row(&sql, params![id as i64], plan_from_row)
        .optional()
        .db_context("Failed to query training plan")?;

    if let Some(ref mut plan) = plan {
        plan.weeks = load_weeks(conn, plan.id)?;
    }
    Ok(plan)
}

fn load_week(conn: &Connection, id: u64) -> Result<Option<TrainingWeek>> {
    let sql = format!("SELECT {WEEK_COLUMNS} FROM training_weeks WHERE id = ?1");
    let mut week = conn
        .query_row(&sql, params![id as i64], week_from_row)
        .optional()
        .db_context("Failed to query training week")?;

    if let Some(ref mut week) = week {
        week.sessions = load_sessions(conn, week.id)?;
    }
    Ok(week)
}

fn load_session(conn: &Connection, id: u64) -> Result<Option<TrainingSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], session_from_row)
        .optional()
        .db_context("Failed to query training session")
}

impl super::Database {
    /// Creates a plan with `duration_weeks` weeks of rest days, atomically.
    pub fn create_training_plan(&mut self, plan: &CreatePlan) -> Result<TrainingPlan> {
        plan.validate()?;
        let now = Timestamp::now();

        self.write(|conn| {
            conn.execute(
                INSERT_PLAN_SQL,
                params![
                    plan.name.trim(),
                    plan.goal,
                    plan.duration_weeks,
                    plan.level,
                    plan.notes,
                    timestamp_text(&now),
                    timestamp_text(&now)
                ],
            )
            .db_context("Failed to insert training plan")?;
            let id = conn.last_insert_rowid() as u64;

            insert_rest_weeks(conn, id, 1, plan.duration_weeks)?;

            load_plan(conn, id)?.ok_or(RunLogError::PlanNotFound { id })
        })
    }

    /// Retrieves a plan with its weeks and sessions.
    pub fn get_training_plan(&mut self, id: u64) -> Result<Option<TrainingPlan>> {
        load_plan(self.connection()?, id)
    }

    /// Lists plan headers (without weeks), most recently changed first.
    pub fn list_training_plans(&mut self) -> Result<Vec<TrainingPlan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM training_plans ORDER BY updated_at DESC, id DESC"
        );
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql).db_context("Failed to prepare query")?;
        let plans = stmt
            .query_map([], plan_from_row)
            .db_context("Failed to query training plans")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect training plans")?;
        Ok(plans)
    }

    /// Replaces a plan's header fields.
    ///
    /// When `duration_weeks` grows, rest weeks are appended; when it shrinks,
    /// trailing weeks (and their sessions) are removed.
    pub fn update_training_plan(&mut self, update: &UpdatePlan) -> Result<TrainingPlan> {
        update.plan.validate()?;
        let id = update.id;
        let plan = &update.plan;
        let now = Timestamp::now();

        self.write(|conn| {
            let affected = conn
                .execute(
                    UPDATE_PLAN_SQL,
                    params![
                        plan.name.trim(),
                        plan.goal,
                        plan.duration_weeks,
                        plan.level,
                        plan.notes,
                        timestamp_text(&now),
                        id as i64
                    ],
                )
                .db_context("Failed to update training plan")?;
            if affected == 0 {
                return Err(RunLogError::PlanNotFound { id });
            }

            let current: u32 = conn
                .query_row(COUNT_WEEKS_SQL, params![id as i64], |row| row.get(0))
                .db_context("Failed to count training weeks")?;
            if plan.duration_weeks > current {
                insert_rest_weeks(conn, id, current + 1, plan.duration_weeks)?;
            } else if plan.duration_weeks < current {
                conn.execute(
                    DELETE_TRAILING_WEEKS_SQL,
                    params![id as i64, plan.duration_weeks],
                )
                .db_context("Failed to remove trailing weeks")?;
            }

            load_plan(conn, id)?.ok_or(RunLogError::PlanNotFound { id })
        })
    }

    /// Deletes a plan with its weeks and sessions. Returns `false` when absent.
    pub fn delete_training_plan(&mut self, id: u64) -> Result<bool> {
        self.write(|conn| {
            let affected = conn
                .execute(DELETE_PLAN_SQL, params![id as i64])
                .db_context("Failed to delete training plan")?;
            Ok(affected > 0)
        })
    }

    /// Retrieves a week with its sessions.
    pub fn get_training_week(&mut self, id: u64) -> Result<Option<TrainingWeek>> {
        load_week(self.connection()?, id)
    }

    /// Replaces a week's fields and touches its plan.
    pub fn update_training_week(&mut self, update: &UpdateWeek) -> Result<TrainingWeek> {
        update.validate()?;
        let id = update.id;
        let now = Timestamp::now();

        self.write(|conn| {
            let plan_id = conn
                .query_row(WEEK_PLAN_ID_SQL, params![id as i64], |row| {
                    row.get::<_, i64>(0)
                })
                .optional()
                .db_context("Failed to look up training week")?
                .ok_or(RunLogError::WeekNotFound { id })?;

            conn.execute(
                UPDATE_WEEK_SQL,
                params![update.focus, update.total_distance, update.notes, id as i64],
            )
            .db_context("Failed to update training week")?;
            touch_plan(conn, plan_id as u64, &now)?;

            load_week(conn, id)?.ok_or(RunLogError::WeekNotFound { id })
        })
    }

    /// Retrieves a single session.
    pub fn get_training_session(&mut self, id: u64) -> Result<Option<TrainingSession>> {
        load_session(self.connection()?, id)
    }

    /// Replaces a session's fields and touches the plan that owns it.
    pub fn update_training_session(&mut self, update: &UpdateSession) -> Result<TrainingSession> {
        update.validate()?;
        let id = update.id;
        let now = Timestamp::now();

        self.write(|conn| {
            let plan_id = conn
                .query_row(SESSION_PLAN_ID_SQL, params![id as i64], |row| {
                    row.get::<_, i64>(0)
                })
                .optional()
                .db_context("Failed to look up training session")?
                .ok_or(RunLogError::SessionNotFound { id })?;

            conn.execute(
                UPDATE_SESSION_SQL,
                params![
                    update.workout_type.trim(),
                    update.distance,
                    update.duration,
                    update.intensity.trim(),
                    update.pace_target,
                    update.hr_zone,
                    update.details,
                    id as i64
                ],
            )
            .db_context("Failed to update training session")?;
            touch_plan(conn, plan_id as u64, &now)?;

            load_session(conn, id)?.ok_or(RunLogError::SessionNotFound { id })
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::db::Database;

    fn create_test_db() -> (Database, NamedTempFile) {
        let temp_file = NamedTempFile::new().expect("temp file");
        let db = Database::new(temp_file.path()).expect("open database");
        (db, temp_file)
    }

    fn ten_k(weeks: u32) -> CreatePlan {
        CreatePlan {
            name: "10K".to_string(),
            goal: Some("Sub-50".to_string()),
            duration_weeks: weeks,
            level: Some("Intermediate".to_string()),
            notes: None,
        }
    }

    fn count(db: &mut Database, table: &str) -> i64 {
        db.connection()
            .expect("connection")
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .expect("count")
    }

    #[test]
    fn test_create_builds_rest_weeks() {
        let (mut db, _temp) = create_test_db();
        let plan = db.create_training_plan(&ten_k(3)).expect("create plan");

        assert_eq!(plan.weeks.len(), 3);
        assert_eq!(plan.weeks[2].week_number, 3);
        assert_eq!(plan.weeks[0].focus.as_deref(), Some("Week 1"));
        for week in &plan.weeks {
            assert_eq!(week.sessions.len(), 7);
            assert!(week.sessions.iter().all(TrainingSession::is_rest));
            assert_eq!(week.sessions[6].day_of_week, 6);
        }
    }

    #[test]
    fn test_delete_cascades() {
        let (mut db, _temp) = create_test_db();
        let plan = db.create_training_plan(&ten_k(2)).expect("create plan");
        assert_eq!(count(&mut db, "training_sessions"), 14);

        assert!(db.delete_training_plan(plan.id).expect("delete"));
        assert_eq!(count(&mut db, "training_weeks"), 0);
        assert_eq!(count(&mut db, "training_sessions"), 0);
        assert!(!db.delete_training_plan(plan.id).expect("second delete"));
    }

    #[test]
    fn test_session_update_touches_plan() {
        let (mut db, _temp) = create_test_db();
        let plan = db.create_training_plan(&ten_k(1)).expect("create plan");
        let session_id = plan.weeks[0].sessions[1].id;

        let session = db
            .update_training_session(&UpdateSession {
                id: session_id,
                workout_type: "Interval".to_string(),
                distance: 8.0,
                duration: 45,
                intensity: "High".to_string(),
                pace_target: Some("4:30".to_string()),
                hr_zone: Some("Z4".to_string()),
                details: Some("6x800m".to_string()),
            })
            .expect("update session");
        assert_eq!(session.workout_type, "Interval");

        let reloaded = db
            .get_training_plan(plan.id)
            .expect("get plan")
            .expect("plan exists");
        assert!(reloaded.updated_at >= plan.updated_at);
        assert_eq!(reloaded.weeks[0].sessions[1].details.as_deref(), Some("6x800m"));
    }

    #[test]
    fn test_week_update_and_missing_week() {
        let (mut db, _temp) = create_test_db();
        let plan = db.create_training_plan(&ten_k(1)).expect("create plan");

        let week = db
            .update_training_week(&UpdateWeek {
                id: plan.weeks[0].id,
                focus: Some("Base".to_string()),
                total_distance: 32.5,
                notes: None,
            })
            .expect("update week");
        assert_eq!(week.total_distance, 32.5);
        assert_eq!(week.sessions.len(), 7);

        let err = db
            .update_training_week(&UpdateWeek {
                id: 9999,
                ..Default::default()
            })
            .expect_err("missing week");
        assert!(matches!(err, RunLogError::WeekNotFound { id: 9999 }));
    }

    #[test]
    fn test_resize_plan() {
        let (mut db, _temp) = create_test_db();
        let plan = db.create_training_plan(&ten_k(2)).expect("create plan");

        let grown = db
            .update_training_plan(&UpdatePlan {
                id: plan.id,
                plan: ten_k(4),
            })
            .expect("grow");
        assert_eq!(grown.weeks.len(), 4);
        assert_eq!(grown.weeks[3].week_number, 4);

        let shrunk = db
            .update_training_plan(&UpdatePlan {
                id: plan.id,
                plan: ten_k(1),
            })
            .expect("shrink");
        assert_eq!(shrunk.weeks.len(), 1);
        assert_eq!(count(&mut db, "training_sessions"), 7);
    }

    #[test]
    fn test_list_orders_by_last_change() {
        let (mut db, _temp) = create_test_db();
        let older = db.create_training_plan(&ten_k(1)).expect("create");
        let newer = db.create_training_plan(&ten_k(1)).expect("create");

        let plans = db.list_training_plans().expect("list");
        assert_eq!(plans[0].id, newer.id);
        assert!(plans.iter().all(|p| p.weeks.is_empty()));

        db.update_training_week(&UpdateWeek {
            id: older.weeks[0].id,
            total_distance: 10.0,
            ..Default::default()
        })
        .expect("touch older");
        let plans = db.list_training_plans().expect("list");
        assert_eq!(plans[0].id, older.id);
    }
}
