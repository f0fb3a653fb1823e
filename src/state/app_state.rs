//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::store::{CartStore, CatalogStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub catalog: Arc<dyn CatalogStore>,
    pub carts: Arc<dyn CartStore>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        catalog: Arc<dyn CatalogStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            auth_service,
            catalog,
            carts,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
