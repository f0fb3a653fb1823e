//! Fixed-window rate limiting
//!
//! 100 requests per 15-minute window per client IP by default, matching the
//! storefront's public API policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Window {
    started: Instant,
    count: u32,
}

/// Shared fixed-window rate limiter state
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Record a request for `key`; false when the window is exhausted.
    pub async fn check(&self, key: &str) -> bool {
        let mut windows = self.windows.write().await;
        let now = Instant::now();

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Drop windows idle longer than the window length.
    pub async fn cleanup(&self) {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        let window = self.window;
        windows.retain(|_, w| now.duration_since(w.started) < window);
    }
}

/// Create a rate limiting middleware layer
pub fn rate_limit_layer(
    rate_limiter: RateLimiter,
) -> impl Fn(
    Request<Body>,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone
       + Send {
    move |request: Request<Body>, next: Next| {
        let rate_limiter = rate_limiter.clone();
        Box::pin(async move {
            let client_key = extract_client_ip(&request);

            if !rate_limiter.check(&client_key).await {
                tracing::warn!(client = %client_key, "Rate limit exceeded");
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, "60")],
                    "Too many requests. Please try again later.",
                )
                    .into_response();
            }

            next.run(request).await
        })
    }
}

/// Extract client IP from request headers
fn extract_client_ip(request: &Request<Body>) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(ip) = s.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            return s.to_string();
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requests_within_limit_pass() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_requests_over_limit_are_blocked() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_limits_are_per_client() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert!(limiter.check("1.1.1.1").await);
        assert!(limiter.check("2.2.2.2").await);
        assert!(!limiter.check("1.1.1.1").await);
    }
}
