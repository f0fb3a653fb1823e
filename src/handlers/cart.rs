//! Cart HTTP handlers
//!
//! Routes carry the owning user's id as a path parameter; the ownership
//! stage of the gate keeps users inside their own cart (admins excepted).

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{check_ownership, AuthenticatedUser};
use crate::models::{Cart, CartItem, UpdateCartRequest};
use crate::state::AppState;

/// GET /carts/:user_id - Fetch a user's cart
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    check_ownership(Some(&user), Some(&user_id))?;

    let owner = parse_user_id(&user_id)?;
    let cart = state
        .carts
        .find_by_user(owner)
        .await?
        .unwrap_or_else(|| Cart::empty(owner));

    Ok(Json(cart))
}

/// PUT /carts/:user_id - Replace the cart contents
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    check_ownership(Some(&user), Some(&user_id))?;
    req.validate()?;

    let owner = parse_user_id(&user_id)?;

    // Prices are captured from the catalog at write time.
    let mut items = Vec::with_capacity(req.items.len());
    for item in req.items {
        let product = state
            .catalog
            .find_by_id(item.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                ApiError::BadRequest(format!("Unknown product: {}", item.product_id))
            })?;

        items.push(CartItem {
            product_id: product.id,
            quantity: item.quantity,
            price: product.price,
        });
    }

    let mut cart = Cart::empty(owner);
    cart.items = items;

    let saved = state.carts.upsert(cart).await?;

    Ok(Json(saved))
}

fn parse_user_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid user id: {}", raw)))
}
