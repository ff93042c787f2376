//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use badge_api::{app, state::AppState};
use badge_common::BadgeConfig;
use badge_renderer::MemoryAssetProvider;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use test_utils::standard_image_assets;
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    let mut config = BadgeConfig::default().with_scale_factor(1);
    config.assets.system_fonts.clear();

    let mut provider = MemoryAssetProvider::new();
    for (name, bytes) in standard_image_assets() {
        provider.insert(name, bytes);
    }
    Arc::new(AppState::new(config, Arc::new(provider)).unwrap())
}

fn test_app(state: Arc<AppState>) -> Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    app(state, handle)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get(test_app(test_state()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_status_badge_is_png() {
    let (status, content_type, body) = get(
        test_app(test_state()),
        "/status-badge?tier=gold&reward_points=12345&discount=25&status_points=7000&nights=30",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));

    let img = image::load_from_memory(&body).unwrap();
    assert_eq!((img.width(), img.height()), (400, 460));
    assert_eq!(img.color(), image::ColorType::Rgba8);
}

#[tokio::test]
async fn test_bad_parameters_still_render() {
    let (status, content_type, _) = get(
        test_app(test_state()),
        "/status-badge?tier=unknown-value&reward_points=abc&status_points=lots&nights=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_no_parameters_render_defaults() {
    let (status, _, body) = get(test_app(test_state()), "/status-badge").await;
    assert_eq!(status, StatusCode::OK);
    assert!(image::load_from_memory(&body).is_ok());
}

#[tokio::test]
async fn test_progress_endpoint() {
    let (status, content_type, body) = get(
        test_app(test_state()),
        "/generate-progress-image?points=7000&nights=abc",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert!(image::load_from_memory(&body).is_ok());
}

#[tokio::test]
async fn test_api_metrics_count_renders_and_fallbacks() {
    let state = test_state();
    get(test_app(state.clone()), "/status-badge?tier=silver").await;
    get(test_app(state.clone()), "/generate-progress-image?points=1").await;

    let (status, _, body) = get(test_app(state), "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["renders_total"], 2);
    assert_eq!(json["render_errors"], 0);
    // Both fonts are absent from the store on every render.
    assert!(json["asset_fallbacks"].as_u64().unwrap() >= 4);
}

#[tokio::test]
async fn test_prometheus_endpoint() {
    let (status, content_type, _) = get(test_app(test_state()), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _, _) = get(test_app(test_state()), "/wms").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
