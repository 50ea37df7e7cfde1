//! diplomat-backend server entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires the pipeline
//! collaborators, and starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use diplomat_backend::api;
use diplomat_backend::app_state::AppState;
use diplomat_backend::completions::{CompletionRouter, OpenAiProvider};
use diplomat_backend::config::AppConfig;
use diplomat_backend::mailer::Mailer;
use diplomat_backend::persistence::PostgresStore;
use diplomat_backend::service::RecommendationService;
use diplomat_backend::snapshot::SnapshotClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting diplomat-backend");

    // Connect to PostgreSQL and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    let store = PostgresStore::new(pool);

    // Wire the pipeline collaborators
    let http = reqwest::Client::new();
    let snapshot = SnapshotClient::new(http.clone(), config.snapshot_graphql_url.clone());
    let router = CompletionRouter::new(OpenAiProvider::new(
        http,
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
    ));
    let mailer = Mailer::from_config(&config)?;
    let recommendation_service = Arc::new(RecommendationService::new(
        snapshot,
        router,
        store.clone(),
        mailer,
    ));

    // Build application state
    let app_state = AppState {
        recommendation_service,
        store,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
