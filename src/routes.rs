//! Routing table
//!
//! Static mapping from URL path patterns to handlers. Patterns are mutually
//! exclusive by literal prefix; redirect targets reference the constants
//! below rather than re-typed literals.

use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, AppState};

// Route names and their path patterns
pub const INDEX: &str = "/";
pub const BOOKS: &str = "/books/";
pub const BOOK_DETAIL: &str = "/books/:id/";
pub const AUTHORS: &str = "/authors/";
pub const AUTHOR_DETAIL: &str = "/authors/:id/";
pub const AUTHOR_BIRTH_YEAR: &str = "/author/birth/:year/";
pub const MY_BORROWED: &str = "/mybooks/";
pub const BORROWED: &str = "/borrowed/";
pub const RENEW_BOOK_LIBRARIAN: &str = "/book/:id/renew/";
pub const AUTHOR_CREATE: &str = "/authors/create/";
pub const AUTHOR_UPDATE: &str = "/authors/:id/update/";
pub const AUTHOR_DELETE: &str = "/authors/:id/delete/";
pub const BOOK_CREATE: &str = "/books/create/";
pub const BOOK_UPDATE: &str = "/books/:id/update/";
pub const BOOK_DELETE: &str = "/books/:id/delete/";

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        // Home page with catalog counts and the session visit counter
        .route(INDEX, get(api::index::index))
        // Books
        .route(BOOKS, get(api::books::list_books))
        .route(
            BOOK_CREATE,
            get(api::books::book_create_form).post(api::books::create_book),
        )
        .route(BOOK_DETAIL, get(api::books::get_book))
        .route(
            BOOK_UPDATE,
            get(api::books::book_update_form).post(api::books::update_book),
        )
        .route(
            BOOK_DELETE,
            get(api::books::book_delete_form).post(api::books::delete_book),
        )
        // Authors
        .route(AUTHORS, get(api::authors::list_authors))
        .route(
            AUTHOR_CREATE,
            get(api::authors::author_create_form).post(api::authors::create_author),
        )
        .route(AUTHOR_DETAIL, get(api::authors::get_author))
        .route(
            AUTHOR_UPDATE,
            get(api::authors::author_update_form).post(api::authors::update_author),
        )
        .route(
            AUTHOR_DELETE,
            get(api::authors::author_delete_form).post(api::authors::delete_author),
        )
        .route(AUTHOR_BIRTH_YEAR, get(api::authors::authors_by_birth_year))
        // Loans
        .route(MY_BORROWED, get(api::loans::my_borrowed))
        .route(BORROWED, get(api::loans::borrowed))
        .route(
            RENEW_BOOK_LIBRARIAN,
            get(api::loans::renew_book_form).post(api::loans::renew_book),
        )
        // Health
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", axum::routing::post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(catalog)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_patterns_are_mutually_exclusive() {
        let patterns = [
            INDEX,
            BOOKS,
            BOOK_DETAIL,
            AUTHORS,
            AUTHOR_DETAIL,
            AUTHOR_BIRTH_YEAR,
            MY_BORROWED,
            BORROWED,
            RENEW_BOOK_LIBRARIAN,
            AUTHOR_CREATE,
            AUTHOR_UPDATE,
            AUTHOR_DELETE,
            BOOK_CREATE,
            BOOK_UPDATE,
            BOOK_DELETE,
        ];
        for (i, a) in patterns.iter().enumerate() {
            for b in patterns.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn mutating_routes_carry_path_parameters_where_expected() {
        assert!(RENEW_BOOK_LIBRARIAN.contains(":id"));
        assert!(AUTHOR_UPDATE.contains(":id"));
        assert!(BOOK_DELETE.contains(":id"));
        assert!(!AUTHOR_CREATE.contains(':'));
        assert!(!BOOK_CREATE.contains(':'));
    }
}
