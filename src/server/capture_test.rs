//! Tests for per-request status capture

use super::*;
use crate::server::metrics::HttpMetrics;
use axum::response::IntoResponse;
use std::sync::Arc;

fn metrics() -> SharedMetrics {
    Arc::new(HttpMetrics::new("test", "rustc test").expect("metrics should register"))
}

#[test]
fn test_default_status_is_recorded_as_200() {
    let metrics = metrics();
    let mut record = RequestRecord::begin(metrics.clone(), &Method::GET, "/health");

    // A plain body response never sets a status explicitly
    let response = "ok".into_response();
    record.capture(&response);
    assert_eq!(record.status(), StatusCode::OK);
    drop(record);

    assert_eq!(metrics.request_count("GET", "/health", 200), 1);
    assert_eq!(metrics.duration_samples("GET", "/health"), 1);
}

#[test]
fn test_explicit_status_is_captured() {
    let metrics = metrics();
    let mut record = RequestRecord::begin(metrics.clone(), &Method::POST, "/api/v1/status");

    let response = (StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response();
    record.capture(&response);
    drop(record);

    assert_eq!(metrics.request_count("POST", "/api/v1/status", 405), 1);
    assert_eq!(metrics.total_requests(), 1);
}

#[test]
fn test_capture_leaves_response_untouched() {
    let metrics = metrics();
    let mut record = RequestRecord::begin(metrics, &Method::GET, "/");

    let response = (StatusCode::ACCEPTED, "queued").into_response();
    record.capture(&response);

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

/// A request abandoned before producing a response must still be counted
#[test]
fn test_record_without_response_counts_as_500() {
    let metrics = metrics();
    let record = RequestRecord::begin(metrics.clone(), &Method::GET, "/slow");
    assert_eq!(record.status(), StatusCode::INTERNAL_SERVER_ERROR);
    drop(record);

    assert_eq!(metrics.request_count("GET", "/slow", 500), 1);
    assert_eq!(metrics.duration_samples("GET", "/slow"), 1);
}

#[test]
fn test_record_fires_exactly_once() {
    let metrics = metrics();
    {
        let mut record = RequestRecord::begin(metrics.clone(), &Method::GET, "/metrics");
        record.capture(&"ok".into_response());
        record.capture(&(StatusCode::NOT_FOUND, "").into_response());
    }

    assert_eq!(metrics.total_requests(), 1);
    // last capture wins
    assert_eq!(metrics.request_count("GET", "/metrics", 404), 1);
}
