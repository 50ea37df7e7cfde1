//! Snapshot webhook handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{BackendError, ErrorResponse};

/// `POST /bot/snapshot_webhook_callback` — Snapshot proposal notification.
///
/// The payload is decoded as loose JSON so a missing `id` field yields
/// the structured 400 envelope rather than a framework rejection. The
/// response body is empty regardless of per-member outcomes; the batch
/// summary goes to the log.
///
/// # Errors
///
/// Returns [`BackendError::InvalidWebhook`] on a malformed payload and
/// [`BackendError::SnapshotUnavailable`] when the hub cannot be queried.
#[utoipa::path(
    post,
    path = "/api/v1/bot/snapshot_webhook_callback",
    tag = "Bot",
    summary = "Snapshot proposal webhook",
    description = "Receives a proposal event and generates a recommendation for every member with a non-empty bio.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Event processed; per-member outcomes are logged"),
        (status = 400, description = "Payload is missing the prefixed `id` field", body = ErrorResponse),
        (status = 502, description = "Snapshot hub unavailable", body = ErrorResponse),
    )
)]
pub async fn snapshot_webhook_callback(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, BackendError> {
    let webhook_id = payload
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| BackendError::InvalidWebhook("missing `id` field".to_string()))?;

    state
        .recommendation_service
        .process_webhook(webhook_id)
        .await?;

    Ok(StatusCode::OK)
}

/// Webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/bot/snapshot_webhook_callback",
        post(snapshot_webhook_callback),
    )
}
