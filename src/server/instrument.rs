//! Request instrumentation middleware
//!
//! Every request, including router fallbacks (404), method mismatches (405)
//! and panicking handlers, passes through [`track_requests`]. Panics are
//! turned into a `500` response here, so the connection task survives and
//! the failure shows up in `http_requests_total{status="500"}`.

use axum::{
    extract::{Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::error;

use super::capture::RequestRecord;
use super::metrics::SharedMetrics;

/// Wrap `router` so every request is timed, logged, and counted
pub fn instrument(router: Router, metrics: SharedMetrics) -> Router {
    router.layer(middleware::from_fn_with_state(metrics, track_requests))
}

/// Dispatch wrapper: time the inner router and record the outcome
pub async fn track_requests(
    State(metrics): State<SharedMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let mut record = RequestRecord::begin(metrics, request.method(), request.uri().path());

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => panic_response(panic),
    };

    record.capture(&response);
    response
}

fn panic_response(panic: Box<dyn Any + Send>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        "internal server error\n",
    )
        .into_response()
}

#[cfg(test)]
#[path = "instrument_test.rs"]
mod instrument_tests;
