//! Top-level router configuration.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `POST /shorten`
//! - **Path normalization** - `/short/Ab3dE9/` and `/short/Ab3dE9` are the same route

use anyhow::Result;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{public_routes, shorten_routes};
use crate::state::AppState;

/// Token bucket settings for the shortening endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

/// Constructs the application router with all routes and middleware.
///
/// When `state.behind_proxy` is set the rate limiter keys on forwarded client
/// headers instead of the peer socket address.
///
/// # Errors
///
/// Returns an error if the rate limit settings are rejected.
pub fn app_router(state: AppState, limits: RateLimit) -> Result<NormalizePath<Router>> {
    let shorten = if state.behind_proxy {
        shorten_routes().layer(rate_limit::proxy_layer(limits.per_second, limits.burst)?)
    } else {
        shorten_routes().layer(rate_limit::layer(limits.per_second, limits.burst)?)
    };

    let router = Router::new()
        .merge(shorten)
        .merge(public_routes())
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
