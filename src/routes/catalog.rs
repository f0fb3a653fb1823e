//! Product catalog routes

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::catalog;
use crate::state::AppState;

/// Create catalog routes; mutations are admin-gated in the handlers
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products", post(catalog::create_product))
        .route("/products/:id", get(catalog::get_product))
        .route("/products/:id", put(catalog::update_product))
        .route("/products/:id", delete(catalog::delete_product))
}
