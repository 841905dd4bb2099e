//! HTTP server for health, status, and metrics endpoints
//!
//! Provides:
//! - `/health` - Liveness probe
//! - `/api/v1/status` - Runtime status
//! - `/metrics` - Prometheus scrape target
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

pub mod capture;
pub mod clock;
mod conn;
pub mod handlers;
pub mod instrument;
pub mod lifecycle;
pub mod metrics;
pub mod routes;
pub mod runtime;
pub mod shutdown;

pub use lifecycle::{LifecycleState, Server, ServerError};
pub use metrics::{create_metrics, HttpMetrics, MetricsError, SharedMetrics};
pub use routes::{build_router, AppState};
pub use shutdown::{shutdown_channel, ShutdownController, ShutdownSignal, TerminationSignals};

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
