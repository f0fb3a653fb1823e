//! Authentication core
//!
//! - Signed, short-lived access tokens (stateless verification)
//! - Opaque, store-backed refresh tokens with revocation
//! - Register/login/refresh/logout orchestration

mod jwt;
mod service;

pub use jwt::{issue_access_token, verify_access_token, AccessClaims, JwtError};
pub use service::{AuthError, AuthService};
