//! Authentication service
//!
//! Orchestrates register/login/refresh/logout over the credential and
//! refresh-token stores. Constructed explicitly with its collaborators;
//! no process-wide state.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AccessTokenResponse, AuthTokensResponse, User, UserResponse};
use crate::store::{CredentialStore, RefreshTokenStore, StoreError};

use super::jwt::{issue_access_token, verify_access_token, AccessClaims, JwtError};

/// Auth service failure kinds
///
/// All of these are expected outcomes of otherwise-valid calls; none is
/// retried internally. `Store` carries opaque infrastructure failures.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Deliberately covers both unknown email and wrong password so error
    /// text cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_days: i64,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
        }
    }

    /// Register a new user. The role is always `user`; it is never
    /// client-settable. Returns the public projection only.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserResponse, AuthError> {
        let email = normalize_email(email);

        // The store's uniqueness constraint is the authority; this lookup
        // only gives the common case a cheaper failure.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let user = self.users.create(name.trim(), &email, password).await?;
        info!(user_id = %user.id, "User registered");

        Ok(user.into())
    }

    /// Verify credentials and issue one access token and one refresh token.
    /// Prior refresh tokens stay valid; concurrent sessions are allowed.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokensResponse, AuthError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.users.verify_password(&user, password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token =
            issue_access_token(&user, &self.jwt_secret, self.access_token_ttl_seconds)?;
        let refresh_token = self
            .refresh_tokens
            .issue(user.id, Duration::days(self.refresh_token_ttl_days))
            .await?;

        info!(user_id = %user.id, "User logged in");

        Ok(AuthTokensResponse {
            user: user.into(),
            access_token,
            refresh_token: refresh_token.token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
        })
    }

    /// Exchange a usable refresh token for a new access token.
    ///
    /// The refresh token is not rotated: the same opaque value remains valid
    /// until its own expiry or an explicit logout.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<AccessTokenResponse, AuthError> {
        let record = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredRefreshToken)?;

        if !record.is_usable(Utc::now()) {
            return Err(AuthError::InvalidOrExpiredRefreshToken);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token =
            issue_access_token(&user, &self.jwt_secret, self.access_token_ttl_seconds)?;

        debug!(user_id = %user.id, "Access token refreshed");

        Ok(AccessTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
        })
    }

    /// Revoke the matching refresh token. Idempotent and uniform: unknown or
    /// already-revoked tokens report success too.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(refresh_token).await?;
        debug!("Refresh token revoked on logout");
        Ok(())
    }

    /// Verify an access token. Pure; no store access (stateless trust
    /// window bounded by the token TTL).
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        verify_access_token(token, &self.jwt_secret)
    }

    /// Fetch a user by ID (for /auth/me).
    pub async fn get_user_by_id(&self, id: uuid::Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
