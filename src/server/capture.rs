//! Per-request status capture
//!
//! A [`RequestRecord`] is opened when a request enters the dispatch wrapper
//! and closes when it is dropped. Closing logs the request and records
//! exactly one counter increment and one latency observation, whether the
//! handler returned normally, panicked, or its future was dropped mid-flight.

use axum::http::{Method, StatusCode};
use axum::response::Response;
use std::time::Instant;
use tracing::{info, warn};

use super::metrics::SharedMetrics;

/// In-flight request context holding the captured status
pub struct RequestRecord {
    metrics: SharedMetrics,
    method: Method,
    path: String,
    started: Instant,
    status: Option<StatusCode>,
}

impl RequestRecord {
    /// Start timing a request
    pub fn begin(metrics: SharedMetrics, method: &Method, path: &str) -> Self {
        Self {
            metrics,
            method: method.clone(),
            path: path.to_string(),
            started: Instant::now(),
            status: None,
        }
    }

    /// Capture the final status of the response, which passes through unchanged
    ///
    /// Responses built without an explicit status carry `200 OK`, so that is
    /// what gets recorded for them.
    pub fn capture<B>(&mut self, response: &Response<B>) {
        self.status = Some(response.status());
    }

    /// Status that will be recorded; 500 until a response has been captured
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Drop for RequestRecord {
    fn drop(&mut self) {
        let duration = self.started.elapsed();
        let status = self.status();

        if self.status.is_none() {
            warn!(
                method = %self.method,
                path = %self.path,
                "Request ended without a response, recording as 500"
            );
        }

        info!(
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            duration_ms = duration.as_secs_f64() * 1000.0,
            "request"
        );

        self.metrics
            .record_request(self.method.as_str(), &self.path, status.as_u16(), duration);
    }
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_tests;
