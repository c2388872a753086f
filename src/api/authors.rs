//! Author endpoints: list, detail, birth-year filter and CRUD forms

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
    routes,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse, PAGE_SIZE};

/// Birth-year path parameter must be exactly four digits; anything else is
/// treated as a path that does not exist
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

/// Current field values shown on an author form
#[derive(Serialize, ToSchema)]
pub struct AuthorFormValues {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author form page
#[derive(Serialize, ToSchema)]
pub struct AuthorFormPage {
    pub form: AuthorFormValues,
}

/// Authors born in a given year
#[derive(Serialize, ToSchema)]
pub struct AuthorBirthYearResponse {
    /// The requested year, echoed for display
    pub birth_year: i32,
    pub authors: Vec<Author>,
}

/// List authors, paged at 10 per name order
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "List of authors", body = PaginatedResponse<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let page = query.page();
    let (items, total) = state.services.catalog.list_authors(page, PAGE_SIZE).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// Get author details by ID, with the author's books
#[utoipa::path(
    get,
    path = "/authors/{id}/",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Authors born in the given 4-digit year. No matches yields an empty list.
#[utoipa::path(
    get,
    path = "/author/birth/{year}/",
    tag = "authors",
    params(
        ("year" = String, Path, description = "4-digit birth year")
    ),
    responses(
        (status = 200, description = "Authors born in that year", body = AuthorBirthYearResponse),
        (status = 404, description = "Year is not a 4-digit number")
    )
)]
pub async fn authors_by_birth_year(
    State(state): State<crate::AppState>,
    Path(year): Path<String>,
) -> AppResult<Json<AuthorBirthYearResponse>> {
    if !YEAR_RE.is_match(&year) {
        return Err(AppError::NotFound(format!(
            "No route for birth year '{}'",
            year
        )));
    }
    let birth_year: i32 = year
        .parse()
        .map_err(|_| AppError::NotFound(format!("No route for birth year '{}'", year)))?;

    let authors = state
        .services
        .catalog
        .authors_by_birth_year(birth_year)
        .await?;

    Ok(Json(AuthorBirthYearResponse {
        birth_year,
        authors,
    }))
}

/// Blank author form. The death date is pre-filled with the catalog's
/// suggested default.
#[utoipa::path(
    get,
    path = "/authors/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blank author form", body = AuthorFormPage),
        (status = 403, description = "Missing can_modify_author_list permission")
    )
)]
pub async fn author_create_form(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AuthorFormPage>> {
    claims.require_modify_author_list()?;

    Ok(Json(AuthorFormPage {
        form: AuthorFormValues {
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            date_of_death: NaiveDate::from_ymd_opt(2020, 6, 11),
        },
    }))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing can_modify_author_list permission")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_modify_author_list()?;

    let created = state.services.catalog.create_author(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Author form pre-filled with the author's current values
#[utoipa::path(
    get,
    path = "/authors/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Pre-filled author form", body = AuthorFormPage),
        (status = 403, description = "Missing can_modify_author_list permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_update_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormPage>> {
    claims.require_modify_author_list()?;

    let details = state.services.catalog.get_author(id).await?;
    let author = details.author;

    Ok(Json(AuthorFormPage {
        form: AuthorFormValues {
            first_name: author.first_name,
            last_name: author.last_name,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        },
    }))
}

/// Update an existing author
#[utoipa::path(
    post,
    path = "/authors/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 403, description = "Missing can_modify_author_list permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(author): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    claims.require_modify_author_list()?;

    let updated = state.services.catalog.update_author(id, author).await?;
    Ok(Json(updated))
}

/// Deletion confirmation page showing the author to be removed
#[utoipa::path(
    get,
    path = "/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author pending deletion", body = AuthorDetails),
        (status = 403, description = "Missing can_modify_author_list permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_delete_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    claims.require_modify_author_list()?;

    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Delete an author and redirect to the authors list
#[utoipa::path(
    post,
    path = "/authors/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 303, description = "Author deleted, redirects to the authors list"),
        (status = 403, description = "Missing can_modify_author_list permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require_modify_author_list()?;

    state.services.catalog.delete_author(id).await?;
    Ok(Redirect::to(routes::AUTHORS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_pattern_accepts_four_digits_only() {
        assert!(YEAR_RE.is_match("1950"));
        assert!(YEAR_RE.is_match("0001"));
        assert!(!YEAR_RE.is_match("195"));
        assert!(!YEAR_RE.is_match("19501"));
        assert!(!YEAR_RE.is_match("19a0"));
        assert!(!YEAR_RE.is_match(""));
    }
}
