//! Cart routes

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::cart;
use crate::state::AppState;

/// Create cart routes; ownership is checked against the path user id
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/carts/:user_id", get(cart::get_cart))
        .route("/carts/:user_id", put(cart::update_cart))
}
