//! Cross-origin access is limited to the configured origin.

use axum::body::Body;
use axum::http::{HeaderValue, Request, header};
use tempfile::tempdir;

use pdfmerge::server;

use crate::common::{send, test_config};

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/merge")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allowed_origin_gets_cors_headers() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.allowed_origin = HeaderValue::from_static("https://merge.example.com");
    let app = server::router(&config);

    let response = send(app, preflight("https://merge.example.com")).await;

    assert!(response.status.is_success());
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some("https://merge.example.com")
    );
}

#[tokio::test]
async fn test_other_origin_gets_no_cors_headers() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.allowed_origin = HeaderValue::from_static("https://merge.example.com");
    let app = server::router(&config);

    let response = send(app, preflight("https://evil.example.net")).await;

    assert!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_preflight_allows_post_only() {
    let dir = tempdir().unwrap();
    let app = server::router(&test_config(dir.path()));

    let response = send(app, preflight(pdfmerge::cli::DEFAULT_ALLOWED_ORIGIN)).await;

    let methods = response
        .header(header::ACCESS_CONTROL_ALLOW_METHODS)
        .expect("preflight lists allowed methods");
    assert!(methods.contains("POST"));
    assert!(!methods.contains("GET"));
}
