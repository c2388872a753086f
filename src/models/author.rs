//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookSummary;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Short author representation embedded in book responses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Author detail response with the author's books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}
