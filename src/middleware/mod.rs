//! Middleware for the storefront API
//!
//! Request logging, rate limiting, security headers, and the access
//! control gate.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{authorize, check_ownership, AdminUser, AuthenticatedUser, GateError, OptionalUser};
pub use rate_limiter::{rate_limit_layer, RateLimiter};
pub use security::security_headers;
pub use tracing::request_logging;
