//! Genres repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::book::Genre};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count all genres
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count genres whose name contains the needle, case-insensitively
    pub async fn count_name_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE name ILIKE '%' || $1 || '%'")
                .bind(needle)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// List all genres, ordered by name (used to populate book forms)
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }
}
