//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    AccessTokenResponse, AuthTokensResponse, LoginRequest, LogoutResponse, RefreshTokenRequest,
    RegisterRequest, UserResponse,
};
use crate::state::AppState;

/// POST /auth/register - Create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    req.validate()?;

    let user = state
        .auth_service
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login - Verify credentials and issue tokens
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokensResponse>, ApiError> {
    req.validate()?;

    let tokens = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(tokens))
}

/// POST /auth/refresh - Exchange a refresh token for a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    req.validate()?;

    let token = state
        .auth_service
        .refresh_access_token(&req.refresh_token)
        .await?;

    Ok(Json(token))
}

/// POST /auth/logout - Revoke a refresh token
///
/// Always returns the same success body, whether or not the token existed.
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<LogoutResponse>, ApiError> {
    req.validate()?;

    state.auth_service.logout(&req.refresh_token).await?;

    Ok(Json(LogoutResponse::ok()))
}

/// GET /auth/me - Current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth_service.get_user_by_id(user.id).await?;

    Ok(Json(user.into()))
}
