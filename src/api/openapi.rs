//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, index, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLib API",
        version = "0.1.0",
        description = "Library Catalog REST API",
        license(name = "MIT")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Home
        index::index,
        // Books
        books::list_books,
        books::get_book,
        books::book_create_form,
        books::create_book,
        books::book_update_form,
        books::update_book,
        books::book_delete_form,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::authors_by_birth_year,
        authors::author_create_form,
        authors::create_author,
        authors::author_update_form,
        authors::update_author,
        authors::author_delete_form,
        authors::delete_author,
        // Loans
        loans::my_borrowed,
        loans::borrowed,
        loans::renew_book_form,
        loans::renew_book,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Home
            index::IndexResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::Genre,
            books::BookFormValues,
            books::BookFormPage,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorSummary,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            authors::AuthorFormValues,
            authors::AuthorFormPage,
            authors::AuthorBirthYearResponse,
            // Loans
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::InstanceStatus,
            crate::models::book_instance::LoanedInstance,
            crate::forms::RenewBookForm,
            crate::forms::FieldError,
            loans::RenewBookPage,
            loans::RenewBookRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Home page counts"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Author catalog"),
        (name = "loans", description = "Borrowed copies and renewals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
