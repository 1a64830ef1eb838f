//! HTTP boundary for the prediction service.
//!
//! Every prediction request is answered with a well-formed JSON payload;
//! failures become the fixed fallback payload, never an error status.

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::RiskScorer;
use crate::application::PredictionService;
use crate::config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub predictions: PredictionService<RiskScorer>,
    pub simulated_latency: Duration,
}

impl AppState {
    /// Create state with the heuristic scorer and the given latency.
    pub fn new(simulated_latency: Duration) -> Self {
        Self {
            predictions: PredictionService::new(Arc::new(RiskScorer::new())),
            simulated_latency,
        }
    }

    /// Create state from server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.simulated_latency)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/predict", post(handlers::predict))
        .route("/api/model", get(handlers::model_info))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
///
/// # Errors
/// Returns error if the listener cannot bind or the server fails.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> crate::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Heartscore listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
