//! Recommendation read handlers: list and get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RecommendationDto;
use crate::app_state::AppState;
use crate::auth::AuthenticatedAccount;
use crate::error::{BackendError, ErrorResponse};

/// `GET /bot/recommendations` — List recommendations visible to the caller.
///
/// Superusers see every row; anyone else sees only rows owned by their
/// own account. Newest first.
///
/// # Errors
///
/// Returns [`BackendError::Unauthorized`] without a valid bearer token
/// and [`BackendError::Persistence`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/bot/recommendations",
    tag = "Bot",
    summary = "List recommendations",
    description = "Returns the caller's recommendations, or every recommendation for superusers.",
    responses(
        (status = 200, description = "Visible recommendations, newest first", body = Vec<RecommendationDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    )
)]
pub async fn list_recommendations(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<impl IntoResponse, BackendError> {
    let rows = state
        .store
        .list_recommendations(account.id, account.is_superuser)
        .await?;

    let data: Vec<RecommendationDto> = rows.into_iter().map(RecommendationDto::from).collect();
    Ok(Json(data))
}

/// `GET /bot/recommendations/:id` — Get one recommendation.
///
/// Responds 404 both for rows that do not exist and for rows owned by a
/// different account, so callers cannot probe for row existence.
///
/// # Errors
///
/// Returns [`BackendError::RecommendationNotFound`] when the row is
/// absent or not visible, and [`BackendError::Unauthorized`] without a
/// valid bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/bot/recommendations/{id}",
    tag = "Bot",
    summary = "Get a recommendation",
    description = "Returns one recommendation if it exists and is visible to the caller.",
    params(
        ("id" = i64, Path, description = "Recommendation row ID"),
    ),
    responses(
        (status = 200, description = "The recommendation", body = RecommendationDto),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "Not found or not visible", body = ErrorResponse),
    )
)]
pub async fn get_recommendation(
    State(state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, BackendError> {
    let row = state
        .store
        .find_recommendation(id, account.id, account.is_superuser)
        .await?
        .ok_or(BackendError::RecommendationNotFound(id))?;

    Ok(Json(RecommendationDto::from(row)))
}

/// Recommendation read routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bot/recommendations", get(list_recommendations))
        .route("/bot/recommendations/{id}", get(get_recommendation))
}
