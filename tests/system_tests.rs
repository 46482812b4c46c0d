mod common;

use axum::http::StatusCode;
use common::{FakeUpstream, get, json_body, spawn_app};
use http_body_util::BodyExt;
use std::sync::Arc;

#[tokio::test]
async fn test_health() {
    let app = spawn_app(Arc::new(FakeUpstream::default())).await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = spawn_app(Arc::new(FakeUpstream::default())).await;

    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Metrics not enabled or failed to initialize");
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = spawn_app(Arc::new(FakeUpstream::default())).await;

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/health")
            .header("origin", "https://city-explorer.example")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
