//! Handler for short URL redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /short/{code}` (a trailing slash is accepted)
///
/// Responds with **302 Found** and a `Location` header. The access is counted
/// in the background, so the redirect does not wait for the store write.
///
/// # Errors
///
/// Returns 404 Not Found naming the code if it does not exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.redirect_service.resolve(&code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}
