//! API route table.

use crate::api::handlers::{
    health_handler, redirect_handler, shorten_handler, stats_handler, stats_list_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Shortening endpoint, kept separate so it can carry its own rate limit.
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Read-only endpoints.
///
/// - `GET /short/{code}` - Redirect to the original URL
/// - `GET /stats`        - Paginated mapping statistics
/// - `GET /stats/{code}` - Statistics for one short code
/// - `GET /health`       - Store, access queue and cache checks
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/short/{code}", get(redirect_handler))
        .route("/stats", get(stats_list_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/health", get(health_handler))
}
