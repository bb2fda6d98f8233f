use axum::{extract::State, Json};
use tracing::instrument;
use validator::Validate;

use crate::auth::{AuthUser, LoginCredentials, TokenResponse};
use crate::errors::ServiceError;
use crate::{ApiResponse, ApiResult, AppState};

/// Exchange an email and password from the account table for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    summary = "Sign in",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<TokenResponse>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Malformed credentials", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unknown email or wrong password", body = crate::errors::ErrorResponse),
    ),
    tag = "Auth"
)]
#[instrument(skip(state, credentials), fields(email = %credentials.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<TokenResponse> {
    credentials.validate()?;
    let token = state.auth.login(&credentials).map_err(ServiceError::from)?;
    Ok(Json(ApiResponse::success(token)))
}

/// Identity carried by the presented token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    summary = "Current identity",
    responses(
        (status = 200, description = "Authenticated account", body = ApiResponse<AuthUser>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Auth"
)]
pub async fn me(user: AuthUser) -> ApiResult<AuthUser> {
    Ok(Json(ApiResponse::success(user)))
}
