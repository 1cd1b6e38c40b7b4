//! Handler for the mapping list.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::stats_list::{PaginationMeta, StatsListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists mappings with their statistics, newest first.
///
/// # Endpoint
///
/// `GET /stats`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 100)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn stats_list_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<StatsListResponse>, AppError> {
    let (offset, limit) = params.validate_and_get_offset_limit().map_err(|e| {
        AppError::bad_request(
            e,
            json!({ "page": params.page, "page_size": params.page_size }),
        )
    })?;

    let page = state.stats_service.list(offset, limit).await?;

    Ok(Json(StatsListResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), page.total),
        items: page.items.into_iter().map(Into::into).collect(),
    }))
}
