//! Movie operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{Movie, MovieFilter, NewMovie};
use crate::repository::{Database, Page};
use crate::utils::clamp_page;

impl MovieFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            MovieFilter::All => "",
            MovieFilter::ByUser(_) => "WHERE user_id = ?",
            MovieFilter::ByService(_) => "WHERE service_id = ?",
        }
    }

    fn bind_value(&self) -> Option<i64> {
        match self {
            MovieFilter::All => None,
            MovieFilter::ByUser(id) | MovieFilter::ByService(id) => Some(*id),
        }
    }
}

impl Database {
    // ==================== Movie Operations ====================

    /// Insert a new movie
    pub async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO movies (name, alt_versions, quality, user_id, service_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&movie.name)
        .bind(movie.alt_versions)
        .bind(&movie.quality)
        .bind(movie.user_id)
        .bind(movie.service_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, "movie references an unknown user or service"))?;

        Ok(Movie {
            id: result.get("id"),
            name: movie.name,
            alt_versions: movie.alt_versions,
            quality: movie.quality,
            user_id: movie.user_id,
            service_id: movie.service_id,
        })
    }

    /// Get a movie by ID
    pub async fn get_movie(&self, id: i64) -> Result<Option<Movie>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, alt_versions, quality, user_id, service_id
            FROM movies
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Movie::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List movies matching a filter, ordered by ID
    pub async fn list_movies(
        &self,
        filter: MovieFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Page<Movie>, DbError> {
        let (offset, limit) = clamp_page(offset, limit);

        let sql = format!(
            "SELECT id, name, alt_versions, quality, user_id, service_id FROM movies {} ORDER BY id LIMIT ? OFFSET ?",
            filter.where_clause()
        );
        let mut query = sqlx::query(&sql);
        if let Some(value) = filter.bind_value() {
            query = query.bind(value);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        let items = rows
            .iter()
            .map(|row| Movie::try_from(row).map_err(DbError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: self.count_movies(filter).await?,
        })
    }

    /// Count movies matching a filter
    pub async fn count_movies(&self, filter: MovieFilter) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) as count FROM movies {}", filter.where_clause());
        let mut query = sqlx::query(&sql);
        if let Some(value) = filter.bind_value() {
            query = query.bind(value);
        }
        let result = query.fetch_one(&self.pool).await?;
        Ok(result.get("count"))
    }

    /// Replace all fields of a movie
    pub async fn update_movie(&self, id: i64, movie: NewMovie) -> Result<Option<Movie>, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET name = ?, alt_versions = ?, quality = ?, user_id = ?, service_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&movie.name)
        .bind(movie.alt_versions)
        .bind(&movie.quality)
        .bind(movie.user_id)
        .bind(movie.service_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_constraint(e, "movie references an unknown user or service"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Movie {
            id,
            name: movie.name,
            alt_versions: movie.alt_versions,
            quality: movie.quality,
            user_id: movie.user_id,
            service_id: movie.service_id,
        }))
    }

    /// Delete a movie
    pub async fn delete_movie(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_db;
    use crate::{DbError, MovieFilter, NewMovie, NewUser};

    fn movie(name: &str, user_id: Option<i64>, service_id: Option<i64>) -> NewMovie {
        NewMovie {
            name: name.to_string(),
            alt_versions: false,
            quality: "1080p".to_string(),
            user_id,
            service_id,
        }
    }

    #[tokio::test]
    async fn test_filters_and_counts() {
        let db = test_db().await;
        let owner = db
            .insert_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                full_name: "Alice".to_string(),
                password_hash: "x".to_string(),
                disabled: false,
            })
            .await
            .unwrap();
        let service = db.insert_service("Criterion Channel").await.unwrap();

        db.insert_movie(movie("Stalker", Some(owner.id), Some(service.id))).await.unwrap();
        db.insert_movie(movie("Solaris", Some(owner.id), None)).await.unwrap();
        db.insert_movie(movie("Mirror", None, Some(service.id))).await.unwrap();

        assert_eq!(db.count_movies(MovieFilter::All).await.unwrap(), 3);

        let by_user = db.list_movies(MovieFilter::ByUser(owner.id), 0, 100).await.unwrap();
        assert_eq!(by_user.total, 2);
        assert!(by_user.items.iter().all(|m| m.user_id == Some(owner.id)));

        let by_service = db
            .list_movies(MovieFilter::ByService(service.id), 0, 1)
            .await
            .unwrap();
        assert_eq!(by_service.total, 2);
        assert_eq!(by_service.items.len(), 1);
        assert_eq!(by_service.items[0].name, "Stalker");
    }

    #[tokio::test]
    async fn test_unknown_reference_rejected() {
        let db = test_db().await;

        let err = db.insert_movie(movie("Ghost", None, Some(42))).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let created = db.insert_movie(movie("Heat", None, None)).await.unwrap();

        let mut changes = movie("Heat", None, None);
        changes.alt_versions = true;
        changes.quality = "4K".to_string();
        let updated = db.update_movie(created.id, changes).await.unwrap().unwrap();
        assert!(updated.alt_versions);
        assert_eq!(db.get_movie(created.id).await.unwrap().unwrap().quality, "4K");

        assert!(db.update_movie(999, movie("x", None, None)).await.unwrap().is_none());

        assert!(db.delete_movie(created.id).await.unwrap());
        assert!(db.get_movie(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_service_orphans_movies() {
        let db = test_db().await;
        let service = db.insert_service("Laserdisc shelf").await.unwrap();
        let film = db.insert_movie(movie("Ran", None, Some(service.id))).await.unwrap();

        assert!(db.delete_service(service.id).await.unwrap());
        assert_eq!(db.get_movie(film.id).await.unwrap().unwrap().service_id, None);
    }
}
