//! Book and genre models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::AuthorSummary;
use super::book_instance::BookInstance;

/// Genre record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub language: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    /// Author display name ("Last, First"), if the book has an author
    pub author: Option<String>,
    pub language: Option<String>,
    pub isbn: Option<String>,
}

/// Book detail response with author, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: Option<AuthorSummary>,
    pub language: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author_id: Option<i32>,
    pub language: Option<String>,
    pub summary: Option<String>,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub language: Option<String>,
    pub summary: Option<String>,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
    /// When present, replaces the book's genre set
    pub genre_ids: Option<Vec<i32>>,
}
