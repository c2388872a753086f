//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserInfo,
}

/// Authenticated identity
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub groups: Vec<String>,
    pub permissions: Vec<String>,
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    // Echo the issued claims back so clients can gate their own UI
    let claims = crate::models::user::UserClaims::from_token(
        &token,
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserInfo {
            id: user.id,
            username: user.username,
            groups: claims.groups,
            permissions: claims.permissions,
        },
    }))
}

/// Current authenticated identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated identity", body = UserInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: claims.user_id,
        username: claims.sub,
        groups: claims.groups,
        permissions: claims.permissions,
    }))
}
