//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the crate returns [`AppError`]. Handlers return it
//! directly and rely on the [`IntoResponse`] impl to produce the JSON error envelope:
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "details": { ... } } }
//! ```
//!
//! Store-level uniqueness violations ([`AppError::DuplicateCode`],
//! [`AppError::DuplicateUrl`]) are recovered inside the services and never reach
//! clients; if one does escape, it is rendered as a generic internal error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Message shown to clients for every 5xx response.
const GENERIC_INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or disallowed input (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown short code (404).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The store already holds this short code.
    #[error("Short code already exists: {code}")]
    DuplicateCode { code: String },

    /// The store already holds a mapping for this URL.
    #[error("URL is already mapped: {url}")]
    DuplicateUrl { url: String },

    /// Unexpected failure (500). Details are logged, never sent to clients.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateCode { .. }
            | AppError::DuplicateUrl { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the client-facing payload.
    ///
    /// Internal failures are collapsed into a generic message with empty details.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::DuplicateCode { .. }
            | AppError::DuplicateUrl { .. }
            | AppError::Internal { .. } => ErrorInfo {
                code: "internal_error",
                message: GENERIC_INTERNAL_MESSAGE.to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal { message, details } => {
                tracing::error!(%message, %details, "Internal error");
            }
            AppError::DuplicateCode { .. } | AppError::DuplicateUrl { .. } => {
                tracing::error!(error = %self, "Unrecovered uniqueness violation");
            }
            _ => {}
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::internal(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}
