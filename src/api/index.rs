//! Home page endpoint: catalog counts and the session visit counter

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;

/// Home page response
#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    /// Total number of books
    pub num_books: i64,
    /// Total number of book copies
    pub num_instances: i64,
    /// Copies currently available
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Total number of genres
    pub num_genres: i64,
    /// Books whose title contains "and" (case-insensitive)
    pub num_books_with_and: i64,
    /// Genres whose name contains "f" (case-insensitive)
    pub num_genres_with_f: i64,
    /// Visits from this session, starting at 1
    pub num_visits: i64,
}

/// Home page: aggregate catalog counts plus the per-session visit counter
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counts and visit counter", body = IndexResponse)
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<IndexResponse>)> {
    let cookie_name = state.services.sessions.cookie_name().to_string();

    // Reuse the visitor's session id, or mint one for a fresh session
    let session_id = jar
        .get(&cookie_name)
        .map(|c| c.value().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let num_visits = state.services.sessions.increment_visits(&session_id).await?;
    let counts = state.services.catalog.index_counts().await?;

    let jar = jar.add(
        Cookie::build((cookie_name, session_id))
            .path("/")
            .http_only(true),
    );

    Ok((
        jar,
        Json(IndexResponse {
            num_books: counts.num_books,
            num_instances: counts.num_instances,
            num_instances_available: counts.num_instances_available,
            num_authors: counts.num_authors,
            num_genres: counts.num_genres,
            num_books_with_and: counts.num_books_with_and,
            num_genres_with_f: counts.num_genres_with_f,
            num_visits,
        }),
    ))
}
