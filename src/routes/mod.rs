//! Route definitions for the storefront API

mod auth;
mod cart;
mod catalog;

pub use auth::auth_routes;
pub use cart::cart_routes;
pub use catalog::catalog_routes;
