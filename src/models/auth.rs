//! Authentication request/response DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Role;

/// Request body for POST /auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Request body for POST /auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for POST /auth/refresh and POST /auth/logout
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Public projection of a user; never carries the password hash
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Tokens issued on successful login
#[derive(Debug, Serialize)]
pub struct AuthTokensResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// A freshly minted access token (refresh flow; the refresh token itself
/// stays valid until its own expiry or logout)
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Uniform logout response, returned whether or not the token existed
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

impl LogoutResponse {
    pub fn ok() -> Self {
        Self {
            message: "Logged out successfully".to_string(),
        }
    }
}
