//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl DbError {
    /// Translate constraint violations reported by SQLite into typed errors.
    ///
    /// Anything that is not a UNIQUE or FOREIGN KEY violation is passed
    /// through as a connection error.
    pub(crate) fn from_constraint(err: sqlx::Error, context: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return DbError::Duplicate(context.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DbError::InvalidReference(context.to_string());
            }
        }
        DbError::Connection(err)
    }
}
