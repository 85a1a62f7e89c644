//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, UpdateUser, User};
use crate::repository::{Database, Page};
use crate::utils::clamp_page;

const USER_COLUMNS: &str =
    "id, username, email, full_name, password_hash, disabled, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// The UNIQUE constraint on `username` settles races between two
    /// registrations of the same name.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, disabled, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.disabled)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_constraint(e, &format!("User '{}' already exists", user.username))
        })?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            disabled: user.disabled,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List users ordered by username
    pub async fn list_users(&self, offset: i64, limit: i64) -> Result<Page<User>, DbError> {
        let (offset, limit) = clamp_page(offset, limit);

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: self.count_users().await?,
        })
    }

    /// Count all users
    pub async fn count_users(&self) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }

    /// Apply a partial update to a user
    ///
    /// Returns `Ok(None)` when no user has the given ID.
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> Result<Option<User>, DbError> {
        let Some(current) = self.get_user_by_id(id).await? else {
            return Ok(None);
        };

        let username = update.username.unwrap_or(current.username);
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, full_name = ?, password_hash = ?, disabled = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&username)
        .bind(update.email.unwrap_or(current.email))
        .bind(update.full_name.unwrap_or(current.full_name))
        .bind(update.password_hash.unwrap_or(current.password_hash))
        .bind(update.disabled.unwrap_or(current.disabled))
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, &format!("User '{}' already exists", username)))?;

        self.get_user_by_id(id).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
