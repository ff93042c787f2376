//! HTTP handlers.

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, instrument};

use badge_common::{BadgeError, BadgeParams, BadgeRequest};

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Query parameters of the progress-only endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressParams {
    pub points: Option<String>,
    pub nights: Option<String>,
}

impl From<ProgressParams> for BadgeParams {
    fn from(p: ProgressParams) -> Self {
        BadgeParams {
            status_points: p.points,
            nights: p.nights,
            ..BadgeParams::default()
        }
    }
}

/// GET /status-badge - Render a badge from tier, reward and progress parameters
#[instrument(skip(state, params))]
pub async fn status_badge_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<BadgeParams>,
) -> Response {
    render_badge(state, BadgeRequest::from_params(&params)).await
}

/// GET /generate-progress-image - Render a badge from `points` and `nights` only
#[instrument(skip(state, params))]
pub async fn progress_image_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ProgressParams>,
) -> Response {
    let params = BadgeParams::from(params);
    render_badge(state, BadgeRequest::from_params(&params)).await
}

/// Render on a blocking thread; asset fetches may block.
async fn render_badge(state: Arc<AppState>, request: BadgeRequest) -> Response {
    let start = Instant::now();
    let composer = state.composer.clone();
    let result = tokio::task::spawn_blocking(move || composer.render_png(&request))
        .await
        .map_err(|e| BadgeError::Internal(format!("render task failed: {}", e)))
        .and_then(|r| r);
    let elapsed_us = start.elapsed().as_micros() as u64;

    match result {
        Ok(rendered) => {
            state.metrics.record_render(elapsed_us, true).await;
            state
                .metrics
                .record_asset_fallbacks(rendered.layout.missing_assets.len());
            (
                [
                    (header::CONTENT_TYPE, "image/png"),
                    (header::CACHE_CONTROL, "no-store"),
                ],
                rendered.png,
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.record_render(elapsed_us, false).await;
            error!(error = %e, "Badge render failed");
            error_response(&e)
        }
    }
}

fn error_response(e: &BadgeError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, e.to_string()).into_response()
}

/// GET /health - Liveness check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}

/// GET /api/metrics - Render counters and timings as JSON
pub async fn api_metrics_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_params_map_to_status_points() {
        let params = BadgeParams::from(ProgressParams {
            points: Some("7000".to_string()),
            nights: Some("30".to_string()),
        });
        let request = BadgeRequest::from_params(&params);
        assert_eq!(request.status_points, 7000);
        assert_eq!(request.nights, 30);
        assert_eq!(request.tier_display(), "GOLD");
    }

    #[test]
    fn test_render_errors_are_server_errors() {
        let response = error_response(&BadgeError::Encode("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
