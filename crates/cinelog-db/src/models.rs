//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User account model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub disabled: bool,
}

/// Update user (for partial updates)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
    pub disabled: Option<bool>,
}

/// Movie model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    /// Whether alternate cuts or versions are held
    #[serde(rename = "altVersions", alias = "alt_versions")]
    pub alt_versions: bool,
    pub quality: String,
    /// Owning user
    pub user_id: Option<i64>,
    /// Hosting service
    pub service_id: Option<i64>,
}

/// New movie (for insertion)
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub name: String,
    pub alt_versions: bool,
    pub quality: String,
    pub user_id: Option<i64>,
    pub service_id: Option<i64>,
}

/// Movie filter for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieFilter {
    All,
    ByUser(i64),
    ByService(i64),
}

/// Streaming or physical service hosting movies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            password_hash: row.try_get("password_hash")?,
            disabled: row.try_get("disabled")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Movie {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Movie {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            alt_versions: row.try_get("alt_versions")?,
            quality: row.try_get("quality")?,
            user_id: row.try_get("user_id")?,
            service_id: row.try_get("service_id")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Service {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Service {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}
