//! Store contracts for the auth core and the catalog surface
//!
//! The auth service holds its two collaborators (`CredentialStore`,
//! `RefreshTokenStore`) as trait objects so the Postgres backend and the
//! in-memory backend are interchangeable. The persistence layer owns
//! row-level atomicity; nothing here takes in-process locks on behalf of
//! callers.

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Cart, Product, ProductListParams, RefreshToken, User};

mod memory;
mod postgres;

pub use memory::{MemoryCartStore, MemoryCatalogStore, MemoryCredentialStore, MemoryRefreshTokenStore};
pub use postgres::{PgCartStore, PgCatalogStore, PgCredentialStore, PgRefreshTokenStore};

/// Store-layer errors
///
/// `Backend` is the opaque infrastructure kind: connectivity and driver
/// failures propagate through it uninterpreted.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for StoreError {
    fn from(e: bcrypt::BcryptError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// User identity storage with salted password hashing
///
/// Emails are expected pre-normalized (trimmed, lowercased) by the caller;
/// implementations enforce uniqueness on the normalized value.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a user, hashing the plaintext password. Fails with
    /// `StoreError::DuplicateEmail` if the email is already present.
    async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Constant-time comparison of a plaintext password against the stored
    /// hash. Never returns the hash to callers.
    async fn verify_password(&self, user: &User, password: &str) -> Result<bool, StoreError> {
        Ok(bcrypt::verify(password, &user.password_hash)?)
    }
}

/// Opaque refresh token storage
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Generate and persist a fresh opaque token for `user_id`, expiring at
    /// `now + ttl`.
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken, StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Mark a token revoked. Idempotent: revoking an already-revoked or
    /// unknown token succeeds.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;
}

/// Product catalog storage (thin CRUD, no invariant logic beyond the schema)
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    async fn update(&self, product: Product) -> Result<Product, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn list(&self, params: &ProductListParams) -> Result<Vec<Product>, StoreError>;
}

/// Cart storage, keyed by owning user
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, StoreError>;

    async fn upsert(&self, cart: Cart) -> Result<Cart, StoreError>;
}

/// Generate an opaque refresh token value: 40 random bytes, hex-encoded
/// (80 characters, 320 bits of entropy).
pub(crate) fn generate_token_value() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 40];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
