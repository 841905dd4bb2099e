//! Tests for the request instrumentation middleware

use super::*;
use crate::server::metrics::HttpMetrics;
use axum::{body::Body, http::Method, routing::get};
use std::sync::Arc;
use tower::ServiceExt;

fn metrics() -> SharedMetrics {
    Arc::new(HttpMetrics::new("test", "rustc test").expect("metrics should register"))
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

fn app(metrics: SharedMetrics) -> Router {
    let router = Router::new()
        .route("/ok", get(|| async { "ok" }))
        .route("/created", get(|| async { StatusCode::CREATED }))
        .route("/boom", get(boom))
        .fallback(|| async { StatusCode::NOT_FOUND });
    instrument(router, metrics)
}

fn request(method: Method, uri: &str) -> Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

#[tokio::test]
async fn test_successful_request_is_recorded() {
    let metrics = metrics();

    let response = app(metrics.clone())
        .oneshot(request(Method::GET, "/ok"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(metrics.request_count("GET", "/ok", 200), 1);
    assert_eq!(metrics.duration_samples("GET", "/ok"), 1);
}

#[tokio::test]
async fn test_explicit_status_is_recorded() {
    let metrics = metrics();

    let response = app(metrics.clone())
        .oneshot(request(Method::GET, "/created"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(metrics.request_count("GET", "/created", 201), 1);
}

#[tokio::test]
async fn test_fallback_404_is_recorded_with_raw_path() {
    let metrics = metrics();

    let response = app(metrics.clone())
        .oneshot(request(Method::GET, "/does/not/exist"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(metrics.request_count("GET", "/does/not/exist", 404), 1);
}

#[tokio::test]
async fn test_method_mismatch_405_is_recorded() {
    let metrics = metrics();

    let response = app(metrics.clone())
        .oneshot(request(Method::DELETE, "/ok"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(metrics.request_count("DELETE", "/ok", 405), 1);
}

/// A panicking handler becomes a 500 and is still counted
#[tokio::test]
async fn test_panic_becomes_500_and_is_recorded() {
    let metrics = metrics();

    let response = app(metrics.clone())
        .oneshot(request(Method::GET, "/boom"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(metrics.request_count("GET", "/boom", 500), 1);
    assert_eq!(metrics.duration_samples("GET", "/boom"), 1);
}

#[tokio::test]
async fn test_router_keeps_serving_after_panic() {
    let metrics = metrics();
    let app = app(metrics.clone());

    let _ = app
        .clone()
        .oneshot(request(Method::GET, "/boom"))
        .await
        .expect("router is infallible");
    let response = app
        .oneshot(request(Method::GET, "/ok"))
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(metrics.total_requests(), 2);
}

/// N concurrent requests add exactly N to the counter total
#[tokio::test]
async fn test_concurrent_requests_each_counted_once() {
    let metrics = metrics();
    let app = app(metrics.clone());
    let paths = ["/ok", "/created", "/missing", "/boom"];

    let requests = (0..64).map(|i| {
        let app = app.clone();
        let path = paths[i % paths.len()];
        tokio::spawn(async move { app.oneshot(request(Method::GET, path)).await })
    });
    for result in futures::future::join_all(requests).await {
        result
            .expect("task should not panic")
            .expect("router is infallible");
    }

    assert_eq!(metrics.total_requests(), 64);
    assert_eq!(metrics.request_count("GET", "/ok", 200), 16);
    assert_eq!(metrics.request_count("GET", "/boom", 500), 16);
}
