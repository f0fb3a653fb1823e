//! Storefront backend server
//!
//! Wires configuration, the Postgres-backed stores, the auth service and
//! the HTTP router, then serves with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use storefront_server::auth::AuthService;
use storefront_server::config::Config;
use storefront_server::db;
use storefront_server::middleware::{
    rate_limit_layer, request_logging, security_headers, RateLimiter,
};
use storefront_server::routes;
use storefront_server::state::AppState;
use storefront_server::store::{
    PgCartStore, PgCatalogStore, PgCredentialStore, PgRefreshTokenStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Startup fails fast on bad configuration (e.g. missing JWT_SECRET).
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = %config.environment.as_str(), "Starting storefront server");

    let db_pool = db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgCredentialStore::new(db_pool.clone())),
        Arc::new(PgRefreshTokenStore::new(db_pool.clone())),
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
        config.jwt_refresh_token_ttl_days,
    ));

    let app_state = AppState::new(
        auth_service,
        Arc::new(PgCatalogStore::new(db_pool.clone())),
        Arc::new(PgCartStore::new(db_pool.clone())),
    );

    let rate_limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max_requests);

    let health_pool = db_pool.clone();
    let app = Router::new()
        .route("/health", get(move || health_check(health_pool.clone())))
        .merge(routes::auth_routes())
        .merge(routes::catalog_routes())
        .merge(routes::cart_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(security_headers))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(axum::middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_layer(limiter)(req, next)
        }))
        .layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listen address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let database = match db::check_health(&pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(allowed_origins) = allowed_origins.filter(|s| !s.is_empty()) else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
