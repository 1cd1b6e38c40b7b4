//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_info::{client_ip, public_base_url, short_url};

/// Creates a short URL, or returns the existing one for a known URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// **201 Created** for a new mapping, **200 OK** when the URL was already shortened:
///
/// ```json
/// {
///   "short_code": "Ab3dE9",
///   "short_url": "http://sho.rt/short/Ab3dE9/",
///   "original_url": "https://example.com/a",
///   "created_at": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed body or a rejected URL; the details
/// list every violated rule.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "body": rejection.body_text() }),
        )
    })?;

    let creator_ip = client_ip(&headers, addr.ip(), state.behind_proxy);

    let outcome = state
        .shorten_service
        .shorten(&request.url, Some(creator_ip))
        .await?;

    let base = public_base_url(&headers, state.base_url.as_deref());
    let short_url = short_url(base.as_deref(), &outcome.mapping.short_code);

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse::from_mapping(outcome.mapping, short_url)),
    ))
}
