//! Auth service integration tests
//!
//! Exercise the full register/login/refresh/logout lifecycle against the
//! in-memory stores.

use std::sync::Arc;

use chrono::Duration;

use storefront_server::auth::{verify_access_token, AuthError, AuthService};
use storefront_server::models::Role;
use storefront_server::store::{
    CredentialStore, MemoryCredentialStore, MemoryRefreshTokenStore, RefreshTokenStore,
};

const SECRET: &str = "test-secret-key";
const ACCESS_TTL_SECONDS: i64 = 900;
const REFRESH_TTL_DAYS: i64 = 7;

struct Harness {
    service: AuthService,
    users: Arc<MemoryCredentialStore>,
    refresh_tokens: Arc<MemoryRefreshTokenStore>,
}

fn harness() -> Harness {
    let users = Arc::new(MemoryCredentialStore::new());
    let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
    let service = AuthService::new(
        users.clone(),
        refresh_tokens.clone(),
        SECRET.to_string(),
        ACCESS_TTL_SECONDS,
        REFRESH_TTL_DAYS,
    );
    Harness {
        service,
        users,
        refresh_tokens,
    }
}

#[tokio::test]
async fn test_register_then_login_succeeds() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    assert_eq!(registered.email, "jane@x.com");
    assert_eq!(registered.name, "Jane");
    assert_eq!(registered.role, Role::User);

    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();
    assert_eq!(tokens.user.email, "jane@x.com");
    assert_eq!(tokens.user.id, registered.id);
}

#[tokio::test]
async fn test_register_normalizes_email_case() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "  Jane@X.COM ", "pw1234")
        .await
        .unwrap();
    assert_eq!(registered.email, "jane@x.com");

    // Login works with any casing of the same address.
    let tokens = h.service.login("JANE@x.com", "pw1234").await.unwrap();
    assert_eq!(tokens.user.email, "jane@x.com");
}

#[tokio::test]
async fn test_register_never_returns_password_material() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    let json = serde_json::to_value(&registered).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("password"));
    assert!(!object.contains_key("password_hash"));
}

#[tokio::test]
async fn test_duplicate_email_rejected_any_case() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    let same = h.service.register("Janet", "jane@x.com", "other1").await;
    assert!(matches!(same, Err(AuthError::DuplicateEmail)));

    let upper = h.service.register("Janet", "JANE@X.COM", "other1").await;
    assert!(matches!(upper, Err(AuthError::DuplicateEmail)));
}

#[tokio::test]
async fn test_password_is_hashed_at_rest() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    let stored = h
        .users
        .find_by_email("jane@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "pw1234");
    assert!(stored.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    let unknown_user = h.service.login("nobody@x.com", "pw1234").await.unwrap_err();
    let wrong_password = h.service.login("jane@x.com", "wrong").await.unwrap_err();

    // Same externally observable kind for both causes.
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert_eq!(unknown_user.to_string(), wrong_password.to_string());
}

#[tokio::test]
async fn test_access_token_claims_mirror_identity() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();

    let claims = verify_access_token(&tokens.access_token, SECRET).unwrap();
    assert_eq!(claims.sub, registered.id.to_string());
    assert_eq!(claims.email, "jane@x.com");
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_refresh_with_fresh_token_succeeds() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();

    let refreshed = h
        .service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();

    // New token, same subject.
    assert_ne!(refreshed.access_token, tokens.access_token);
    let original = verify_access_token(&tokens.access_token, SECRET).unwrap();
    let renewed = verify_access_token(&refreshed.access_token, SECRET).unwrap();
    assert_eq!(original.sub, renewed.sub);
}

#[tokio::test]
async fn test_refresh_with_unknown_token_fails() {
    let h = harness();

    let result = h.service.refresh_access_token("no-such-token").await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidOrExpiredRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_with_revoked_token_fails() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();

    h.service.logout(&tokens.refresh_token).await.unwrap();

    let result = h.service.refresh_access_token(&tokens.refresh_token).await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidOrExpiredRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_with_expired_token_fails() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    // Issue a token directly through the store with a TTL in the past.
    let expired = h
        .refresh_tokens
        .issue(registered.id, Duration::seconds(-1))
        .await
        .unwrap();

    let result = h.service.refresh_access_token(&expired.token).await;
    assert!(matches!(
        result,
        Err(AuthError::InvalidOrExpiredRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_does_not_rotate_refresh_token() {
    // Intentional design: the refresh token is not rotated on use and
    // remains valid until its own expiry or an explicit logout.
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();

    h.service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();

    // The same opaque string still works.
    let again = h.service.refresh_access_token(&tokens.refresh_token).await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();

    assert!(h.service.logout(&tokens.refresh_token).await.is_ok());
    assert!(h.service.logout(&tokens.refresh_token).await.is_ok());
    assert!(h.service.logout("never-issued-token").await.is_ok());
}

#[tokio::test]
async fn test_concurrent_sessions_stay_valid() {
    // A second login does not invalidate the first session's refresh token.
    let h = harness();

    h.service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();
    let first = h.service.login("jane@x.com", "pw1234").await.unwrap();
    let second = h.service.login("jane@x.com", "pw1234").await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert!(h
        .service
        .refresh_access_token(&first.refresh_token)
        .await
        .is_ok());
    assert!(h
        .service
        .refresh_access_token(&second.refresh_token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_end_to_end_lifecycle() {
    let h = harness();

    let registered = h
        .service
        .register("Jane", "jane@x.com", "pw1234")
        .await
        .unwrap();

    let tokens = h.service.login("jane@x.com", "pw1234").await.unwrap();
    assert_eq!(tokens.user.email, "jane@x.com");
    assert_eq!(tokens.access_token.split('.').count(), 3);
    assert!(tokens.refresh_token.len() >= 40);
    assert!(tokens.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));

    let refreshed = h
        .service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();
    assert_ne!(refreshed.access_token, tokens.access_token);
    assert_eq!(
        verify_access_token(&refreshed.access_token, SECRET)
            .unwrap()
            .sub,
        registered.id.to_string()
    );

    h.service.logout(&tokens.refresh_token).await.unwrap();
    let after_logout = h.service.refresh_access_token(&tokens.refresh_token).await;
    assert!(matches!(
        after_logout,
        Err(AuthError::InvalidOrExpiredRefreshToken)
    ));
}
