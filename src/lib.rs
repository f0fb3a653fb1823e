//! Storefront backend library
//!
//! Token lifecycle and access control for a storefront API: credential
//! verification, short-lived signed access tokens, store-backed refresh
//! tokens with revocation, and per-request role/ownership authorization.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
