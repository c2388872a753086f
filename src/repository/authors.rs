//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorSummary, CreateAuthor, UpdateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List authors, paginated, ordered by last name then first name
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        let total = self.count().await?;

        let authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY last_name, first_name LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((authors, total))
    }

    /// All authors as summaries, for the book form's author choices
    pub async fn list_summaries(&self) -> AppResult<Vec<AuthorSummary>> {
        let authors = sqlx::query_as::<_, AuthorSummary>(
            "SELECT id, first_name, last_name FROM authors ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Authors born in the given year
    pub async fn by_birth_year(&self, year: i32) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE date_of_birth IS NOT NULL
              AND EXTRACT(YEAR FROM date_of_birth)::int = $1
            ORDER BY last_name, first_name
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Update an existing author, keeping current values for absent fields
    pub async fn update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let current = self.get_by_id(id).await?;

        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2, date_of_birth = $3, date_of_death = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(author.first_name.as_ref().unwrap_or(&current.first_name))
        .bind(author.last_name.as_ref().unwrap_or(&current.last_name))
        .bind(author.date_of_birth.or(current.date_of_birth))
        .bind(author.date_of_death.or(current.date_of_death))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
