//! Handler for per-code statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns access statistics for a short code.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let mapping = state.stats_service.get_stats(&code).await?;

    Ok(Json(mapping.into()))
}
