//! Aggregates over logged runs.

use rusqlite::ToSql;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{MonthlyDistance, Pace, RunStatistics},
    params::StatsQuery,
};

const TOTALS_SQL: &str = "SELECT COUNT(*), COALESCE(SUM(distance), 0), COALESCE(SUM(duration), 0), \
                          COALESCE(MAX(distance), 0) FROM runs";
const PACE_SQL: &str = "SELECT MIN(duration * 60.0 / distance), SUM(duration) * 60.0 / SUM(distance) \
                        FROM runs WHERE distance > 0";
const MONTHLY_SQL: &str = "SELECT CAST(strftime('%m', date) AS INTEGER) AS month, \
                           SUM(distance), COUNT(*) FROM runs";

/// WHERE fragments and bindings for a statistics scope.
fn scope(query: &StatsQuery) -> (Vec<&'static str>, Vec<Box<dyn ToSql>>) {
    let mut conditions = Vec::new();
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(user_id) = query.user_id {
        conditions.push("user_id = ?");
        params_vec.push(Box::new(user_id as i64));
    }
    if let Some(year) = query.year {
        conditions.push("date >= ? AND date <= ?");
        params_vec.push(Box::new(format!("{year:04}-01-01")));
        params_vec.push(Box::new(format!("{year:04}-12-31")));
    }
    (conditions, params_vec)
}

fn with_conditions(base: &str, joiner: &str, conditions: &[&str]) -> String {
    if conditions.is_empty() {
        base.to_string()
    } else {
        format!("{base} {joiner} {}", conditions.join(" AND "))
    }
}

fn seconds_to_pace(seconds: Option<f64>) -> Option<Pace> {
    seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| Pace::from_seconds(s.round() as u64))
}

impl super::Database {
    /// Totals, longest run and paces for the runs in scope.
    pub fn run_statistics(&mut self, query: &StatsQuery) -> Result<RunStatistics> {
        let (conditions, params_vec) = scope(query);
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();
        let conn = self.connection()?;

        let totals_sql = with_conditions(TOTALS_SQL, "WHERE", &conditions);
        let (total_runs, total_distance, total_duration, longest_run): (i64, f64, i64, f64) = conn
            .query_row(&totals_sql, &params_refs[..], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .db_context("Failed to compute run totals")?;

        let pace_sql = with_conditions(PACE_SQL, "AND", &conditions);
        let (fastest, average): (Option<f64>, Option<f64>) = conn
            .query_row(&pace_sql, &params_refs[..], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .db_context("Failed to compute paces")?;

        Ok(RunStatistics {
            total_runs: total_runs as u64,
            total_distance,
            total_duration: total_duration as u64,
            longest_run,
            fastest_pace: seconds_to_pace(fastest),
            average_pace: seconds_to_pace(average),
        })
    }

    /// Distance per calendar month of `year`, always twelve entries.
    pub fn monthly_distance(&mut self, user_id: Option<u64>, year: i16) -> Result<Vec<MonthlyDistance>> {
        let (conditions, params_vec) = scope(&StatsQuery {
            user_id,
            year: Some(year),
        });
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();
        let sql = format!(
            "{} GROUP BY month",
            with_conditions(MONTHLY_SQL, "WHERE", &conditions)
        );

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql).db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(&params_refs[..], |row| {
                Ok((
                    row.get::<_, Option<i64>>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .db_context("Failed to query monthly distance")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect monthly distance")?;

        let mut months: Vec<MonthlyDistance> = (1..=12)
            .map(|month| MonthlyDistance {
                month,
                ..Default::default()
            })
            .collect();
        for (month, distance, runs) in rows {
            if let Some(slot) = month
                .and_then(|m| usize::try_from(m - 1).ok())
                .and_then(|index| months.get_mut(index))
            {
                slot.distance = distance;
                slot.runs = runs as u64;
            }
        }
        Ok(months)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::{db::Database, params::CreateRun};

    fn seeded_db() -> (Database, NamedTempFile) {
        let temp = NamedTempFile::new().expect("temp file");
        let mut db = Database::new(temp.path()).expect("open database");
        for (date, distance, duration) in [
            ("2024-01-10", 5.0, 30),
            ("2024-01-20", 10.0, 50),
            ("2024-03-05", 0.0, 15),
            ("2023-12-31", 21.1, 120),
        ] {
            db.add_run(&CreateRun {
                date: date.to_string(),
                distance,
                duration,
                ..Default::default()
            })
            .expect("add run");
        }
        (db, temp)
    }

    #[test]
    fn test_statistics_for_year() {
        let (mut db, _temp) = seeded_db();
        let stats = db
            .run_statistics(&StatsQuery {
                user_id: None,
                year: Some(2024),
            })
            .expect("statistics");

        assert_eq!(stats.total_runs, 3);
        assert_eq!(stats.total_distance, 15.0);
        assert_eq!(stats.total_duration, 95);
        assert_eq!(stats.longest_run, 10.0);
        assert_eq!(stats.fastest_pace.map(|p| p.to_string()).as_deref(), Some("5:00"));
        assert_eq!(stats.average_pace.map(|p| p.to_string()).as_deref(), Some("5:20"));
    }

    #[test]
    fn test_statistics_on_empty_store() {
        let temp = NamedTempFile::new().expect("temp file");
        let mut db = Database::new(temp.path()).expect("open database");
        let stats = db.run_statistics(&StatsQuery::default()).expect("statistics");

        assert_eq!(stats.total_runs, 0);
        assert!(stats.fastest_pace.is_none());
    }

    #[test]
    fn test_monthly_distance_has_twelve_buckets() {
        let (mut db, _temp) = seeded_db();
        let months = db.monthly_distance(None, 2024).expect("monthly");

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].distance, 15.0);
        assert_eq!(months[0].runs, 2);
        assert_eq!(months[2].runs, 1);
        assert_eq!(months[11].runs, 0);
    }
}
