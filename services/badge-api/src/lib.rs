//! Status badge HTTP service library.
//!
//! This module exposes the router and its parts for testing purposes.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the service router.
pub fn app(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        // Badge endpoints
        .route("/status-badge", get(handlers::status_badge_handler))
        .route(
            "/generate-progress-image",
            get(handlers::progress_image_handler),
        )
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/metrics", get(handlers::api_metrics_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
