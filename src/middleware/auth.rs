//! Access control gate
//!
//! Three composable stages, chained per route as needed:
//! 1. authenticate — bearer token to `AuthenticatedUser` (extractor)
//! 2. `authorize` — role allow-list check
//! 3. `check_ownership` — resource-owner check with admin override

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AuthService, JwtError};
use crate::models::Role;

/// Principal attached to a request after successful authentication;
/// lives only for the duration of that request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Gate failure kinds; 401 for authentication, 403 for authorization.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Access denied")]
    AccessDenied,
}

impl GateError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            GateError::AuthenticationRequired | GateError::InvalidToken | GateError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            GateError::InsufficientPermissions | GateError::AccessDenied => StatusCode::FORBIDDEN,
        }
    }

    pub(crate) fn error_code(&self) -> &'static str {
        match self {
            GateError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            GateError::InvalidToken => "INVALID_TOKEN",
            GateError::TokenExpired => "TOKEN_EXPIRED",
            GateError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            GateError::AccessDenied => "ACCESS_DENIED",
        }
    }
}

#[derive(Serialize)]
struct GateErrorBody {
    error: GateErrorDetails,
}

#[derive(Serialize)]
struct GateErrorDetails {
    code: String,
    message: String,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = GateErrorBody {
            error: GateErrorDetails {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Pull the bearer token out of the Authorization header. Accepts either a
/// `Bearer <token>` prefix or a bare token.
fn bearer_token(parts: &Parts) -> Result<&str, GateError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(GateError::AuthenticationRequired)?
        .to_str()
        .map_err(|_| GateError::InvalidToken)?;

    Ok(header.strip_prefix("Bearer ").unwrap_or(header).trim())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        let claims = auth_service.verify_access_token(token).map_err(|e| match e {
            JwtError::Expired => GateError::TokenExpired,
            _ => GateError::InvalidToken,
        })?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| GateError::InvalidToken)?;
        let role = Role::parse(&claims.role).ok_or(GateError::InvalidToken)?;

        Ok(AuthenticatedUser {
            id,
            email: claims.email,
            role,
        })
    }
}

/// Extractor that attempts authentication but never rejects; handlers with
/// optional auth (e.g. admins seeing inactive products) use this.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// Extractor shorthand for admin-only routes.
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        authorize(Some(&user), &[Role::Admin])?;
        Ok(AdminUser(user))
    }
}

/// Stage 2: role check against an allow-list. An empty list admits any
/// authenticated principal.
pub fn authorize(
    principal: Option<&AuthenticatedUser>,
    allowed: &[Role],
) -> Result<(), GateError> {
    let principal = principal.ok_or(GateError::AuthenticationRequired)?;

    if !allowed.is_empty() && !allowed.contains(&principal.role) {
        return Err(GateError::InsufficientPermissions);
    }

    Ok(())
}

/// Stage 3: ownership check. Admins always pass; a missing owner id means
/// no ownership constraint applies. Ids are compared as normalized strings.
pub fn check_ownership(
    principal: Option<&AuthenticatedUser>,
    owner_id: Option<&str>,
) -> Result<(), GateError> {
    let principal = principal.ok_or(GateError::AuthenticationRequired)?;

    if principal.role == Role::Admin {
        return Ok(());
    }

    if let Some(owner_id) = owner_id {
        if owner_id.trim() != principal.id.to_string() {
            return Err(GateError::AccessDenied);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_authorize_empty_list_admits_any_authenticated() {
        let user = principal(Role::User);
        assert_eq!(authorize(Some(&user), &[]), Ok(()));
    }

    #[test]
    fn test_authorize_passes_listed_role() {
        let user = principal(Role::User);
        assert_eq!(authorize(Some(&user), &[Role::User, Role::Admin]), Ok(()));
    }

    #[test]
    fn test_authorize_rejects_unlisted_role() {
        let user = principal(Role::User);
        assert_eq!(
            authorize(Some(&user), &[Role::Admin]),
            Err(GateError::InsufficientPermissions)
        );
    }

    #[test]
    fn test_authorize_requires_principal() {
        assert_eq!(
            authorize(None, &[Role::User]),
            Err(GateError::AuthenticationRequired)
        );
        assert_eq!(authorize(None, &[]), Err(GateError::AuthenticationRequired));
    }

    #[test]
    fn test_ownership_owner_passes() {
        let user = principal(Role::User);
        let owner = user.id.to_string();
        assert_eq!(check_ownership(Some(&user), Some(&owner)), Ok(()));
    }

    #[test]
    fn test_ownership_non_owner_is_denied() {
        let user = principal(Role::User);
        let other = Uuid::new_v4().to_string();
        assert_eq!(
            check_ownership(Some(&user), Some(&other)),
            Err(GateError::AccessDenied)
        );
    }

    #[test]
    fn test_ownership_admin_passes_any_resource() {
        let admin = principal(Role::Admin);
        let other = Uuid::new_v4().to_string();
        assert_eq!(check_ownership(Some(&admin), Some(&other)), Ok(()));
    }

    #[test]
    fn test_ownership_missing_owner_passes() {
        let user = principal(Role::User);
        assert_eq!(check_ownership(Some(&user), None), Ok(()));
    }

    #[test]
    fn test_ownership_requires_principal() {
        assert_eq!(
            check_ownership(None, Some("123")),
            Err(GateError::AuthenticationRequired)
        );
    }

    #[test]
    fn test_gate_error_status_codes() {
        assert_eq!(
            GateError::AuthenticationRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(GateError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(GateError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GateError::InsufficientPermissions.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(GateError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
    }
}
