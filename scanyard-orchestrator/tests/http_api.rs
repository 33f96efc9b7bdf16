//! HTTP API tests against the router with an in-memory store and mock scanners

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use common::*;
use scanyard_core::config::ServerConfig;
use scanyard_orchestrator::application::ScanningService;
use scanyard_orchestrator::presentation::{AppState, create_router};

fn router_with(versions_file: PathBuf) -> Router {
    let log = CallLog::default();
    router_for(service(healthy_pipeline(&log), 10, DEFAULT_TTL), versions_file)
}

fn router_for(scanning_service: Arc<ScanningService>, versions_file: PathBuf) -> Router {
    let state = AppState {
        scanning_service,
        versions_file: Arc::new(versions_file),
    };
    let config = ServerConfig {
        enable_docs: false,
        ..ServerConfig::default()
    };
    create_router(state, &config)
}

fn router() -> Router {
    router_with(PathBuf::from("/nonexistent/versions.json"))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_scan_round_trip() {
    let router = router();

    let (status, body) = send(&router, post_json("/scans", r#"{"image": "alpine:latest"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let scan_id = serde_json::from_str::<Value>(&body).unwrap()["scan_id"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(uuid::Uuid::parse_str(&scan_id).is_ok());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let (_, body) = send(&router, get(&format!("/scans/{scan_id}/status"))).await;
        let status: Value = serde_json::from_str(&body).unwrap();
        if status["status"] == "COMPLETED" {
            break;
        }
        assert!(["NEW", "IN-PROGRESS"].contains(&status["status"].as_str().unwrap()));
        assert!(tokio::time::Instant::now() < deadline, "scan never completed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let (status, body) = send(&router, get(&format!("/scans/{scan_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["version"], "1");
    assert!(report["vulnerabilities"]["Vulnerabilities"].is_array());
    assert!(report["audit"]["details"].is_array());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let router = router();

    let (status, body) = send(&router, post_json("/scans", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap()["error"],
        "Failed to decode request params"
    );

    let (status, _) = send(&router, post_json("/scans", r#"{"username": "x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_image_is_rejected() {
    let (status, body) = send(&router(), post_json("/scans", r#"{"image": "  "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());
}

#[tokio::test]
async fn test_unknown_scan() {
    let router = router();

    let (status, body) = send(&router, get("/scans/nope/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["status"], "ERROR");

    let (status, body) = send(&router, get("/scans/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());
}

#[tokio::test]
async fn test_health_root_and_fallback() {
    let router = router();

    assert_eq!(send(&router, get("/healthz")).await, (StatusCode::OK, "OK".to_string()));

    let (status, banner) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(banner.starts_with("scanyard"));

    assert_eq!(
        send(&router, get("/definitely/not/here")).await,
        (StatusCode::NOT_FOUND, "404 Not Found".to_string())
    );
}

#[tokio::test]
async fn test_version_serves_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("versions.json");
    std::fs::write(&path, r#"{"trivy": "0.50.1", "dockle": "0.4.14"}"#).unwrap();

    let (status, body) = send(&router_with(path), get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["trivy"], "0.50.1");

    let (status, _) = send(&router(), get("/version")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let request = Request::builder()
        .uri("/healthz")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_submission_is_unavailable_when_store_is_down() {
    let log = CallLog::default();
    let store = Arc::new(FailingStore::new().failing_status_writes(1));
    let router = router_for(
        service_with_store(healthy_pipeline(&log), 10, store),
        PathBuf::from("/nonexistent/versions.json"),
    );

    let (status, body) = send(&router, post_json("/scans", r#"{"image": "alpine:latest"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Failed to record scan");
    assert!(log.entries().is_empty());
}
