//! Catalog and cart models
//!
//! Thin CRUD surface around the auth core; schema rules follow the
//! storefront's product catalog (non-negative price/stock, active flag).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Catalog product row
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a product (admin only)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// Request body for updating a product (admin only); absent fields keep
/// their current value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing products
#[derive(Debug, Deserialize, Default)]
pub struct ProductListParams {
    pub category: Option<String>,
    /// Admins may pass `include_inactive=true`; ignored for everyone else.
    pub include_inactive: Option<bool>,
}

/// One line in a cart; price is captured at add time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: f64,
}

/// Per-user shopping cart; one cart per user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Cart {
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total: 0.0,
            updated_at: Utc::now(),
        }
    }

    /// Recompute `total` from the items; called on every write.
    pub fn recalculate_total(&mut self) -> f64 {
        self.total = self
            .items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum();
        self.total
    }
}

/// Request body for replacing the cart contents
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartRequest {
    #[validate]
    pub items: Vec<CartItemRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CartItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
}
