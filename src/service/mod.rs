//! Service layer: business logic orchestration.
//!
//! [`RecommendationService`] runs the webhook-to-email pipeline,
//! delegating to the Snapshot client, the completion router, the store,
//! and the mailer.

pub mod recommendation_service;

pub use recommendation_service::{BatchSummary, RecommendationService};
