//! Catalog service: books, authors, genres and the home-page counts

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, AuthorSummary, CreateAuthor, UpdateAuthor},
        book::{Book, BookDetails, BookSummary, CreateBook, Genre, UpdateBook},
    },
    repository::Repository,
};

/// Aggregate counts displayed on the home page
#[derive(Debug, Clone, Copy)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    pub num_books_with_and: i64,
    pub num_genres_with_f: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Database connectivity probe for the readiness endpoint
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }

    /// Aggregate counts for the home page. Empty tables yield zeroes.
    pub async fn index_counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.instances.count().await?,
            num_instances_available: self.repository.instances.count_available().await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
            num_books_with_and: self.repository.books.count_title_contains("and").await?,
            num_genres_with_f: self.repository.genres.count_name_contains("f").await?,
        })
    }

    // Books

    pub async fn list_books(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    /// Book detail with its author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let mut book = self.repository.books.get_by_id(id).await?;
        book.instances = self.repository.instances.list_for_book(id).await?;
        Ok(book)
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// All genres, for the book form's genre choices
    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    // Authors

    pub async fn list_authors(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, per_page).await
    }

    /// Author detail with the author's books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    /// Author choices for the book form
    pub async fn author_choices(&self) -> AppResult<Vec<AuthorSummary>> {
        self.repository.authors.list_summaries().await
    }

    /// Authors born in the given year; no matches is an empty list
    pub async fn authors_by_birth_year(&self, year: i32) -> AppResult<Vec<Author>> {
        self.repository.authors.by_birth_year(year).await
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&author).await
    }

    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &author).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }
}
