//! Backend error types with HTTP status code mapping.
//!
//! [`BackendError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid webhook payload: missing `id` field",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category     | HTTP Status               |
/// |-----------|--------------|---------------------------|
/// | 1000–1999 | Request/Auth | 400 Bad Request / 401     |
/// | 2000–2999 | Not Found    | 404 Not Found             |
/// | 3000–3099 | Server       | 500 Internal Server Error |
/// | 3100–3999 | Upstream     | 501 / 502                 |
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The webhook payload is missing an `id` field or the field does not
    /// carry the expected `proposal/` prefix.
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),

    /// The bearer token is missing, malformed, expired, or references an
    /// unknown account.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Recommendation with the given ID was not found (or is owned by a
    /// different account).
    #[error("recommendation not found: {0}")]
    RecommendationNotFound(i64),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Mail transport failure while sending a recommendation summary.
    #[error("mail error: {0}")]
    Mail(String),

    /// The Snapshot hub rejected a query or could not be reached.
    #[error("snapshot hub unavailable: {0}")]
    SnapshotUnavailable(String),

    /// The completion provider rejected a request or returned an
    /// undecodable response.
    #[error("completion provider error: {0}")]
    Completion(String),

    /// The member's chosen language model has no wired provider yet.
    #[error("no completion provider implemented for model: {0}")]
    ProviderUnimplemented(&'static str),
}

impl BackendError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidWebhook(_) => 1001,
            Self::Unauthorized(_) => 1101,
            Self::RecommendationNotFound(_) => 2001,
            Self::Persistence(_) => 3001,
            Self::Mail(_) => 3002,
            Self::SnapshotUnavailable(_) => 3101,
            Self::Completion(_) => 3102,
            Self::ProviderUnimplemented(_) => 3103,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidWebhook(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::RecommendationNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SnapshotUnavailable(_) | Self::Completion(_) => StatusCode::BAD_GATEWAY,
            Self::ProviderUnimplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
