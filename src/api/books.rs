//! Book endpoints: list, detail and the permission-gated CRUD forms

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::AuthorSummary,
        book::{Book, BookDetails, BookSummary, CreateBook, Genre, UpdateBook},
    },
    routes,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse, PAGE_SIZE};

/// Current field values shown on a book form
#[derive(Serialize, ToSchema)]
pub struct BookFormValues {
    pub title: String,
    pub author_id: Option<i32>,
    pub language: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub genre_ids: Vec<i32>,
}

/// Book form page with selectable authors and genres
#[derive(Serialize, ToSchema)]
pub struct BookFormPage {
    pub form: BookFormValues,
    /// Author choices
    pub authors: Vec<AuthorSummary>,
    /// Genre choices
    pub genres: Vec<Genre>,
}

/// List books, paged at 10 per title order
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<BookSummary>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookSummary>>> {
    let page = query.page();
    let (items, total) = state.services.catalog.list_books(page, PAGE_SIZE).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}/",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Blank book form with author and genre choices
#[utoipa::path(
    get,
    path = "/books/create/",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blank book form", body = BookFormPage),
        (status = 403, description = "Missing add_book permission")
    )
)]
pub async fn book_create_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BookFormPage>> {
    claims.require_add_book()?;

    Ok(Json(BookFormPage {
        form: BookFormValues {
            title: String::new(),
            author_id: None,
            language: None,
            summary: None,
            isbn: None,
            genre_ids: Vec::new(),
        },
        authors: state.services.catalog.author_choices().await?,
        genres: state.services.catalog.list_genres().await?,
    }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/create/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing add_book permission")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_add_book()?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Book form pre-filled with the book's current values
#[utoipa::path(
    get,
    path = "/books/{id}/update/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Pre-filled book form", body = BookFormPage),
        (status = 403, description = "Missing change_book permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_update_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookFormPage>> {
    claims.require_change_book()?;

    let book = state.services.catalog.get_book(id).await?;

    Ok(Json(BookFormPage {
        form: BookFormValues {
            title: book.title,
            author_id: book.author.map(|a| a.id),
            language: book.language,
            summary: book.summary,
            isbn: book.isbn,
            genre_ids: book.genres.iter().map(|g| g.id).collect(),
        },
        authors: state.services.catalog.author_choices().await?,
        genres: state.services.catalog.list_genres().await?,
    }))
}

/// Update an existing book
#[utoipa::path(
    post,
    path = "/books/{id}/update/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Missing change_book permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_change_book()?;

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Deletion confirmation page showing the book to be removed
#[utoipa::path(
    get,
    path = "/books/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book pending deletion", body = BookDetails),
        (status = 403, description = "Missing delete_book permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_delete_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    claims.require_delete_book()?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Delete a book and redirect to the authors list
#[utoipa::path(
    post,
    path = "/books/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Book deleted, redirects to the authors list"),
        (status = 403, description = "Missing delete_book permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require_delete_book()?;

    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to(routes::AUTHORS))
}
