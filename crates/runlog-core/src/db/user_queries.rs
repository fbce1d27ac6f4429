//! Local user accounts with salted password hashes.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::{parse_column, timestamp_text};
use crate::{
    error::{DatabaseResultExt, Result, RunLogError},
    models::User,
    params::{Credentials, RegisterUser},
};

const USER_COLUMNS: &str = "id, username, name, email, created_at";
const INSERT_USER_SQL: &str = "INSERT INTO users (username, password_hash, name, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const USERNAME_TAKEN_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 COLLATE NOCASE)";
const SELECT_HASH_SQL: &str =
    "SELECT id, password_hash FROM users WHERE username = ?1 COLLATE NOCASE";

const HASH_SCHEME: &str = "sha256";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<_, i64>("id")? as u64,
        username: row.get("username")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: parse_column::<Timestamp>(row, "created_at")?,
    })
}

fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// `sha256$<salt>$<digest>` where digest = sha256(salt || password).
fn hash_password(username: &str, password: &str, now: &Timestamp) -> String {
    let nanos = now.as_nanosecond().to_string();
    let salt_source = sha256_hex(&[username.as_bytes(), nanos.as_bytes()]);
    let salt = &salt_source[..32];
    let digest = sha256_hex(&[salt.as_bytes(), password.as_bytes()]);
    format!("{HASH_SCHEME}${salt}${digest}")
}

fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(HASH_SCHEME), Some(salt), Some(digest)) => {
            sha256_hex(&[salt.as_bytes(), password.as_bytes()]) == digest
        }
        _ => false,
    }
}

impl super::Database {
    /// Creates a user. Usernames are unique regardless of case.
    pub fn register_user(&mut self, user: &RegisterUser) -> Result<User> {
        user.validate()?;
        let username = user.username.trim();
        let now = Timestamp::now();
        let password_hash = hash_password(username, &user.password, &now);

        let id = self.write(|conn| {
            let taken: bool = conn
                .query_row(USERNAME_TAKEN_SQL, params![username], |row| row.get(0))
                .db_context("Failed to check username")?;
            if taken {
                return Err(RunLogError::DuplicateUser {
                    username: username.to_string(),
                });
            }

            conn.execute(
                INSERT_USER_SQL,
                params![
                    username,
                    password_hash,
                    user.name,
                    user.email,
                    timestamp_text(&now)
                ],
            )
            .db_context("Failed to insert user")?;
            Ok(conn.last_insert_rowid() as u64)
        })?;

        self.get_user(id)?.ok_or_else(|| RunLogError::UserNotFound {
            username: username.to_string(),
        })
    }

    /// Retrieves a user by ID.
    pub fn get_user(&mut self, id: u64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        self.connection()?
            .query_row(&sql, params![id as i64], user_from_row)
            .optional()
            .db_context("Failed to query user")
    }

    /// Checks a username/password pair. `None` for an unknown user or a wrong
    /// password alike.
    pub fn authenticate(&mut self, credentials: &Credentials) -> Result<Option<User>> {
        let stored: Option<(i64, String)> = self
            .connection()?
            .query_row(
                SELECT_HASH_SQL,
                params![credentials.username.trim()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .db_context("Failed to query user credentials")?;

        match stored {
            Some((id, hash)) if verify_password(&hash, &credentials.password) => {
                self.get_user(id as u64)
            }
            _ => {
                debug!("Authentication failed for '{}'", credentials.username);
                Ok(None)
            }
        }
    }
}
