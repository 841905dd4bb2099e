//! Endpoint handlers
//!
//! - `/health` - Liveness: always 200 while the process can answer
//! - `/api/v1/status` - Build, host, and runtime details (GET only)
//! - `/metrics` - Prometheus text exposition
//! - `/` - Discovery document pointing at the other endpoints

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::clock::rfc3339;
use super::routes::AppState;
use super::runtime::{self, format_uptime, MemoryStats, ProcessStats};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub hostname: String,
    pub uptime: String,
    pub rust_version: &'static str,
    /// OS threads in the process
    pub threads: Option<u64>,
    /// Tasks alive on the tokio runtime
    pub tasks: Option<usize>,
    pub memory: MemoryStats,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryDocument {
    pub message: String,
    pub docs: &'static str,
    pub health: &'static str,
    pub metrics: &'static str,
}

/// Liveness probe handler
///
/// Never consults anything beyond the process itself.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: format_uptime(state.uptime.elapsed()),
    })
}

/// Runtime status handler, sampled fresh on every call
///
/// Mounted for every method; anything but GET (HEAD included) gets a 405.
pub async fn status(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed().await;
    }

    let process = ProcessStats::sample();

    Json(StatusResponse {
        service: crate::SERVICE_NAME,
        version: crate::VERSION,
        environment: state.environment.to_string(),
        hostname: state.hostname.to_string(),
        uptime: format_uptime(state.uptime.elapsed()),
        rust_version: runtime::rust_version(),
        threads: process.threads,
        tasks: runtime::alive_tasks(),
        memory: process.memory,
        timestamp: rfc3339(state.clock.now()),
    })
    .into_response()
}

/// Any method other than GET on `/api/v1/status`
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(CONTENT_TYPE, TEXT_PLAIN)],
        "method not allowed\n",
    )
        .into_response()
}

/// Prometheus metrics handler
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, state.metrics.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, TEXT_PLAIN.to_string())],
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Root discovery document, served only for exactly `/`
pub async fn root() -> Json<DiscoveryDocument> {
    Json(DiscoveryDocument {
        message: format!("{} is running", crate::SERVICE_NAME),
        docs: "/api/v1/status",
        health: "/health",
        metrics: "/metrics",
    })
}

/// Fallback for every unmatched path
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, TEXT_PLAIN)],
        "404 page not found\n",
    )
        .into_response()
}
