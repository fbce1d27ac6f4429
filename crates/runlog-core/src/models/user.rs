//! User account model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A local user account. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Timestamp,
}

/// A single key/value application setting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
