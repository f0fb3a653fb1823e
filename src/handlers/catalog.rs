//! Product catalog HTTP handlers
//!
//! Listing and lookup are public (active products only); admins may see
//! inactive products and perform mutations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{AdminUser, OptionalUser};
use crate::models::{
    CreateProductRequest, Product, ProductListParams, Role, UpdateProductRequest,
};
use crate::state::AppState;

/// GET /products - List products; inactive ones only for admins
pub async fn list_products(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(mut params): Query<ProductListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let is_admin = user.map_or(false, |u| u.role == Role::Admin);
    if !is_admin {
        params.include_inactive = Some(false);
    }

    let products = state.catalog.list(&params).await?;

    Ok(Json(products))
}

/// GET /products/:id - Fetch one product
pub async fn get_product(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .catalog
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))?;

    let is_admin = user.map_or(false, |u| u.role == Role::Admin);
    if !product.is_active && !is_admin {
        return Err(ApiError::NotFound(format!("Product {} not found", id)));
    }

    Ok(Json(product))
}

/// POST /products - Create a product (admin only)
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    req.validate()?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        description: req.description,
        price: req.price,
        category: req.category.trim().to_string(),
        stock: req.stock.unwrap_or(0),
        image_url: req.image_url,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let saved = state.catalog.insert(product).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /products/:id - Update a product (admin only)
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    req.validate()?;

    let mut product = state
        .catalog
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))?;

    if let Some(name) = req.name {
        product.name = name.trim().to_string();
    }
    if let Some(description) = req.description {
        product.description = description;
    }
    if let Some(price) = req.price {
        product.price = price;
    }
    if let Some(category) = req.category {
        product.category = category.trim().to_string();
    }
    if let Some(stock) = req.stock {
        product.stock = stock;
    }
    if let Some(image_url) = req.image_url {
        product.image_url = Some(image_url);
    }
    if let Some(is_active) = req.is_active {
        product.is_active = is_active;
    }

    let saved = state.catalog.update(product).await?;

    Ok(Json(saved))
}

/// DELETE /products/:id - Remove a product (admin only)
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.catalog.delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Product {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
