//! Key/value application settings.

use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, RunLogError},
    models::Setting,
};

const SELECT_SETTING_SQL: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_SETTING_SQL: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2) \
                                  ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const LIST_SETTINGS_SQL: &str = "SELECT key, value FROM settings ORDER BY key";

impl super::Database {
    /// Value stored under `key`, if any.
    pub fn get_setting(&mut self, key: &str) -> Result<Option<String>> {
        self.connection()?
            .query_row(SELECT_SETTING_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to query setting")
    }

    /// Inserts or replaces a setting.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<Setting> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RunLogError::invalid_input("key").with_reason("cannot be empty"));
        }

        self.write(|conn| {
            conn.execute(UPSERT_SETTING_SQL, params![key, value])
                .db_context("Failed to store setting")?;
            Ok(())
        })?;

        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Every setting, ordered by key.
    pub fn list_settings(&mut self) -> Result<Vec<Setting>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(LIST_SETTINGS_SQL)
            .db_context("Failed to prepare query")?;
        let settings = stmt
            .query_map([], |row| {
                Ok(Setting {
                    key: row.get("key")?,
                    value: row.get("value")?,
                })
            })
            .db_context("Failed to query settings")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to collect settings")?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use crate::db::Database;

    #[test]
    fn test_defaults_and_upsert() {
        let temp = NamedTempFile::new().expect("temp file");
        let mut db = Database::new(temp.path()).expect("open database");

        assert_eq!(db.get_setting("theme").expect("get").as_deref(), Some("dark"));
        assert_eq!(db.get_setting("units").expect("get").as_deref(), Some("metric"));
        assert!(db.get_setting("missing").expect("get").is_none());

        db.set_setting("theme", "light").expect("set");
        assert_eq!(db.get_setting("theme").expect("get").as_deref(), Some("light"));

        let keys: Vec<String> = db
            .list_settings()
            .expect("list")
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["theme", "units"]);
    }

    #[test]
    fn test_blank_key_rejected() {
        let temp = NamedTempFile::new().expect("temp file");
        let mut db = Database::new(temp.path()).expect("open database");
        assert!(db.set_setting("  ", "x").is_err());
    }
}
