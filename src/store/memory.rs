//! In-memory store implementations
//!
//! Backing maps behind `tokio::sync::RwLock`; used as the test backend and
//! for running the server without Postgres. Semantics match the Postgres
//! implementations, including case-insensitive email uniqueness and
//! non-deleting refresh-token revocation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Cart, Product, ProductListParams, RefreshToken, Role, User};

use super::{
    generate_token_value, CartStore, CatalogStore, CredentialStore, RefreshTokenStore, StoreError,
};

#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promote an existing user to admin; test/bootstrap helper.
    pub async fn set_role(&self, id: Uuid, role: Role) {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.role = role;
            user.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let password_hash = bcrypt::hash(password, DEFAULT_COST)?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct MemoryRefreshTokenStore {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken, StoreError> {
        let now = Utc::now();
        let record = RefreshToken {
            token: generate_token_value(),
            user_id,
            expires_at: now + ttl,
            revoked: false,
            created_at: now,
        };

        self.tokens
            .write()
            .await
            .insert(record.token.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        if let Some(record) = self.tokens.write().await.get_mut(token) {
            record.revoked = true;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, mut product: Product) -> Result<Product, StoreError> {
        product.updated_at = Utc::now();
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self, params: &ProductListParams) -> Result<Vec<Product>, StoreError> {
        let include_inactive = params.include_inactive.unwrap_or(false);
        let products = self.products.read().await;

        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| include_inactive || p.is_active)
            .filter(|p| {
                params
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category == c)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(matched)
    }
}

#[derive(Clone, Default)]
pub struct MemoryCartStore {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, mut cart: Cart) -> Result<Cart, StoreError> {
        cart.recalculate_total();
        cart.updated_at = Utc::now();
        self.carts.write().await.insert(cart.user_id, cart.clone());
        Ok(cart)
    }
}
