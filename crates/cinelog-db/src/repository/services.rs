//! Service operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::Service;
use crate::repository::{Database, Page};
use crate::utils::clamp_page;

impl Database {
    // ==================== Service Operations ====================

    /// Insert a new service
    pub async fn insert_service(&self, name: &str) -> Result<Service, DbError> {
        let result = sqlx::query("INSERT INTO services (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(Service {
            id: result.get("id"),
            name: name.to_string(),
        })
    }

    /// Get a service by ID
    pub async fn get_service(&self, id: i64) -> Result<Option<Service>, DbError> {
        let result = sqlx::query("SELECT id, name FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Service::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List services ordered by name
    pub async fn list_services(&self, offset: i64, limit: i64) -> Result<Page<Service>, DbError> {
        let (offset, limit) = clamp_page(offset, limit);

        let rows = sqlx::query("SELECT id, name FROM services ORDER BY name, id LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(|row| Service::try_from(row).map_err(DbError::from))
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query("SELECT COUNT(*) as count FROM services")
            .fetch_one(&self.pool)
            .await?
            .get("count");

        Ok(Page { items, total })
    }

    /// Rename a service
    pub async fn update_service(&self, id: i64, name: &str) -> Result<Option<Service>, DbError> {
        let result = sqlx::query("UPDATE services SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Service {
            id,
            name: name.to_string(),
        }))
    }

    /// Delete a service
    pub async fn delete_service(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_db;

    #[tokio::test]
    async fn test_service_lifecycle() {
        let db = test_db().await;

        let netflix = db.insert_service("Netflix").await.unwrap();
        db.insert_service("Blu-ray").await.unwrap();

        let page = db.list_services(0, 100).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].name, "Blu-ray");

        let renamed = db.update_service(netflix.id, "Netflix DE").await.unwrap().unwrap();
        assert_eq!(renamed.name, "Netflix DE");
        assert!(db.update_service(777, "nope").await.unwrap().is_none());

        assert!(db.delete_service(netflix.id).await.unwrap());
        assert!(db.get_service(netflix.id).await.unwrap().is_none());
    }
}
