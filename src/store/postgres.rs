//! Postgres-backed store implementations

use async_trait::async_trait;
use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Cart, CartItem, Product, ProductListParams, RefreshToken, Role, User};

use super::{
    generate_token_value, CartStore, CatalogStore, CredentialStore, RefreshTokenStore, StoreError,
};

/// Postgres unique-violation SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let password_hash = bcrypt::hash(password, DEFAULT_COST)?;
        let now = Utc::now();

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(Role::User)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::from(e)
            }
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<RefreshToken, StoreError> {
        let now = Utc::now();
        let record = RefreshToken {
            token: generate_token_value(),
            user_id,
            expires_at: now + ttl,
            revoked: false,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at, revoked, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.revoked)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let record = sqlx::query_as(
            r#"
            SELECT token, user_id, expires_at, revoked, created_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        // Zero rows affected means unknown or already revoked; both are fine.
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = $1 AND revoked = FALSE
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let saved = sqlx::query_as(
            r#"
            INSERT INTO products
                (id, name, description, price, category, stock, image_url, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, description, price, category, stock, image_url, is_active, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn update(&self, product: Product) -> Result<Product, StoreError> {
        let saved = sqlx::query_as(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5,
                stock = $6, image_url = $7, is_active = $8, updated_at = $9
            WHERE id = $1
            RETURNING id, name, description, price, category, stock, image_url, is_active, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let rows = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as(
            r#"
            SELECT id, name, description, price, category, stock, image_url, is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, params: &ProductListParams) -> Result<Vec<Product>, StoreError> {
        let include_inactive = params.include_inactive.unwrap_or(false);

        let products = sqlx::query_as(
            r#"
            SELECT id, name, description, price, category, stock, image_url, is_active, created_at, updated_at
            FROM products
            WHERE ($1 OR is_active = TRUE)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(include_inactive)
        .bind(&params.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

/// Cart row as stored: items live in a JSONB column.
#[derive(sqlx::FromRow)]
struct CartRow {
    user_id: Uuid,
    items: Json<Vec<CartItem>>,
    total: f64,
    updated_at: chrono::DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Cart {
            user_id: row.user_id,
            items: row.items.0,
            total: row.total,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, StoreError> {
        let row: Option<CartRow> = sqlx::query_as(
            r#"
            SELECT user_id, items, total, updated_at
            FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn upsert(&self, mut cart: Cart) -> Result<Cart, StoreError> {
        cart.recalculate_total();
        cart.updated_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items, total, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET items = $2, total = $3, updated_at = $4
            "#,
        )
        .bind(cart.user_id)
        .bind(Json(&cart.items))
        .bind(cart.total)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(cart)
    }
}
