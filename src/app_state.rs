//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PostgresStore;
use crate::service::RecommendationService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Webhook pipeline orchestrator.
    pub recommendation_service: Arc<RecommendationService>,
    /// Store for the authenticated read surface and token resolution.
    pub store: PostgresStore,
}
