//! Loaned-copy lists and the renewal workflow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::{FieldError, RenewBookForm},
    models::book_instance::{BookInstance, LoanedInstance},
    routes,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse, PAGE_SIZE};

/// Renewal form page: the instance being renewed, the bound form values
/// and any field-level validation errors
#[derive(Serialize, ToSchema)]
pub struct RenewBookPage {
    pub book_instance: BookInstance,
    pub form: RenewBookForm,
    pub errors: Vec<FieldError>,
}

/// Submitted renewal data
#[derive(Deserialize, ToSchema)]
pub struct RenewBookRequest {
    /// Requested due date (YYYY-MM-DD)
    pub due_back: String,
}

/// Copies on loan to the requesting user, soonest-due first.
/// Requires membership in the "Library Members" group.
#[utoipa::path(
    get,
    path = "/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "The user's borrowed copies", body = PaginatedResponse<LoanedInstance>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a library member")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedInstance>>> {
    claims.require_library_member()?;

    let page = query.page();
    let (items, total) = state
        .services
        .loans
        .loaned_to_user(claims.user_id, page, PAGE_SIZE)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// All copies on loan, regardless of borrower, soonest-due first.
/// Requires the can_mark_returned permission.
#[utoipa::path(
    get,
    path = "/borrowed/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All borrowed copies", body = PaginatedResponse<LoanedInstance>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned permission")
    )
)]
pub async fn borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedInstance>>> {
    claims.require_mark_returned()?;

    let page = query.page();
    let (items, total) = state.services.loans.loaned_all(page, PAGE_SIZE).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// Renewal form pre-populated with the proposed date (today + 3 weeks)
#[utoipa::path(
    get,
    path = "/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance UUID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewBookPage),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_book_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewBookPage>> {
    claims.require_mark_returned()?;

    let book_instance = state.services.loans.get_instance(id).await?;
    let form = RenewBookForm::proposed(Utc::now().date_naive());

    Ok(Json(RenewBookPage {
        book_instance,
        form,
        errors: Vec::new(),
    }))
}

/// Renew a loaned copy.
///
/// The submitted due date is validated before any mutation; a valid date is
/// persisted (due_back only, never status or borrower) and the request is
/// redirected to the borrowed list. An invalid date re-renders the form with
/// field errors and mutates nothing.
#[utoipa::path(
    post,
    path = "/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance UUID")
    ),
    request_body = RenewBookRequest,
    responses(
        (status = 303, description = "Renewed, redirects to the borrowed list"),
        (status = 400, description = "Validation failed, form re-rendered", body = RenewBookPage),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned permission"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewBookRequest>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    let book_instance = state.services.loans.get_instance(id).await?;

    let form = RenewBookForm {
        due_back: request.due_back,
    };

    match form.validate(Utc::now().date_naive()) {
        Ok(due_back) => {
            state.services.loans.renew(id, due_back).await?;
            Ok(Redirect::to(routes::BORROWED).into_response())
        }
        Err(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(RenewBookPage {
                book_instance,
                form,
                errors,
            }),
        )
            .into_response()),
    }
}
