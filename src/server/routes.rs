//! Router construction and shared handler state

use axum::{routing::any, Router};
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::handlers;
use super::instrument::instrument;
use super::metrics::SharedMetrics;
use super::runtime::{self, Uptime};

/// State shared by every handler
///
/// Everything here is read-only after startup except the metrics, which
/// accumulate through their own atomics.
#[derive(Clone)]
pub struct AppState {
    pub(crate) metrics: SharedMetrics,
    pub(crate) uptime: Uptime,
    pub(crate) environment: Arc<str>,
    pub(crate) hostname: Arc<str>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl AppState {
    /// Capture process start and resolve the hostname once
    pub fn new(metrics: SharedMetrics, environment: impl Into<String>) -> Self {
        Self {
            metrics,
            uptime: Uptime::start(),
            environment: Arc::from(environment.into()),
            hostname: Arc::from(runtime::hostname()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock used for status timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }
}

/// Bare routes without instrumentation
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", any(handlers::health))
        .route("/metrics", any(handlers::metrics))
        .route("/api/v1/status", any(handlers::status))
        .route("/", any(handlers::root))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Routes wrapped in the request instrumentation layer
pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    instrument(routes(state), metrics)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_tests;
