//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorSummary,
        book::{Book, BookDetails, BookSummary, CreateBook, Genre, UpdateBook},
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books whose title contains the needle, case-insensitively
    pub async fn count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE '%' || $1 || '%'")
                .bind(needle)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// List books, paginated, ordered by title
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        let total = self.count().await?;

        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title,
                   a.last_name || ', ' || a.first_name AS author,
                   b.language, b.isbn
            FROM books b
            LEFT JOIN authors a ON b.author_id = a.id
            ORDER BY b.title
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }

    /// Books written by the given author, ordered by title
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title,
                   a.last_name || ', ' || a.first_name AS author,
                   b.language, b.isbn
            FROM books b
            LEFT JOIN authors a ON b.author_id = a.id
            WHERE b.author_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get book by ID with its author and genres (instances are fetched separately)
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        let row = sqlx::query(
            r#"
            SELECT b.id, b.title, b.language, b.summary, b.isbn,
                   a.id AS author_id, a.first_name, a.last_name
            FROM books b
            LEFT JOIN authors a ON b.author_id = a.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let author = row
            .get::<Option<i32>, _>("author_id")
            .map(|author_id| AuthorSummary {
                id: author_id,
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
            });

        let genres = self.genres_of(id).await?;

        Ok(BookDetails {
            id: row.get("id"),
            title: row.get("title"),
            author,
            language: row.get("language"),
            summary: row.get("summary"),
            isbn: row.get("isbn"),
            genres,
            instances: Vec::new(),
        })
    }

    /// Genres attached to a book
    pub async fn genres_of(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    /// Create a new book and attach its genres
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, language, summary, isbn)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author_id, language, summary, isbn
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.language)
        .bind(&book.summary)
        .bind(&book.isbn)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &book.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Update an existing book, keeping current values for absent fields;
    /// when genre_ids is present the genre set is replaced
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let current = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, language, summary, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, language = $3, summary = $4, isbn = $5
            WHERE id = $6
            RETURNING id, title, author_id, language, summary, isbn
            "#,
        )
        .bind(book.title.as_ref().unwrap_or(&current.title))
        .bind(book.author_id.or(current.author_id))
        .bind(book.language.as_ref().or(current.language.as_ref()))
        .bind(book.summary.as_ref().or(current.summary.as_ref()))
        .bind(book.isbn.as_ref().or(current.isbn.as_ref()))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref genre_ids) = book.genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book (genres and instances cascade in the schema)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
