//! Settings and user account operations for the Logbook.

use super::Logbook;
use crate::{
    error::Result,
    models::{Setting, User},
    params::{Credentials, Id, RegisterUser, SetSetting},
};

impl Logbook {
    /// Value of a setting, if present.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_database(move |db| db.get_setting(&key)).await
    }

    /// Inserts or replaces a setting.
    pub async fn set_setting(&self, params: &SetSetting) -> Result<Setting> {
        let SetSetting { key, value } = params.clone();
        self.with_database(move |db| db.set_setting(&key, &value))
            .await
    }

    /// All settings, ordered by key.
    pub async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.with_database(|db| db.list_settings()).await
    }

    /// Registers a local user.
    pub async fn register_user(&self, params: &RegisterUser) -> Result<User> {
        let user = params.clone();
        self.with_database(move |db| db.register_user(&user)).await
    }

    /// A user by ID.
    pub async fn get_user(&self, params: &Id) -> Result<Option<User>> {
        let id = params.id;
        self.with_database(move |db| db.get_user(id)).await
    }

    /// Checks credentials; `None` when they do not match.
    pub async fn authenticate(&self, params: &Credentials) -> Result<Option<User>> {
        let credentials = params.clone();
        self.with_database(move |db| db.authenticate(&credentials))
            .await
    }
}
