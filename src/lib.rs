//! infra-deployer: operational HTTP endpoints for health checks, runtime
//! status, and Prometheus scraping.

pub mod config;
pub mod healthcheck;
pub mod server;

/// Service name reported by `/api/v1/status` and the discovery document
pub const SERVICE_NAME: &str = "infra-deployer";

/// Release version, stamped at build time (see `build.rs`)
pub const VERSION: &str = env!("BUILD_VERSION");
