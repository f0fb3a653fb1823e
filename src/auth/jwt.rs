//! Access token codec
//!
//! Creates and verifies signed, time-limited access tokens (HS256).
//! Verification is a pure function of the secret and the clock; no store
//! lookup happens here, so a token stays trusted for its full TTL even if
//! the underlying identity changes (deliberate stateless trust window).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

/// Token codec errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

/// Claims carried by an access token; mirrors the identity at issuance time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Unique token ID; makes same-second issuance produce distinct tokens
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issue an access token for `user`, valid for `ttl_seconds`.
pub fn issue_access_token(
    user: &User,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let claims = AccessClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

/// Verify and decode an access token.
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_verifies_and_mirrors_identity() {
        let user = test_user();
        let secret = "test-secret-key";

        let token = issue_access_token(&user, secret, 900).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = verify_access_token(&token, secret).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_same_second_tokens_are_distinct() {
        let user = test_user();
        let secret = "test-secret-key";

        let first = issue_access_token(&user, secret, 900).unwrap();
        let second = issue_access_token(&user, secret, 900).unwrap();
        assert_ne!(first, second);

        // Same subject either way
        let a = verify_access_token(&first, secret).unwrap();
        let b = verify_access_token(&second, secret).unwrap();
        assert_eq!(a.sub, b.sub);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        assert_eq!(
            verify_access_token("not-a-token", "secret"),
            Err(JwtError::Malformed)
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = issue_access_token(&test_user(), "secret-one", 900).unwrap();
        assert_eq!(
            verify_access_token(&token, "secret-two"),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_access_token(&test_user(), "secret", -10).unwrap();
        assert_eq!(verify_access_token(&token, "secret"), Err(JwtError::Expired));
    }
}
