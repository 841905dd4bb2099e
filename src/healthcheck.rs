//! Self-healthcheck for container runtimes
//!
//! `infra-deployer -healthcheck` probes the locally running instance and
//! exits 0 when `/health` answers 200, 1 otherwise. Meant for Docker
//! `HEALTHCHECK` directives in images that ship no curl.

use std::time::Duration;
use thiserror::Error;

/// Default time budget for the probe
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum HealthcheckError {
    #[error("health request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("health endpoint returned {0}")]
    Unhealthy(reqwest::StatusCode),
}

/// URL probed for a server listening on `port` locally
pub fn health_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/health", port)
}

/// GET `/health` on the local instance; only a 200 counts as healthy
pub async fn probe(port: u16, timeout: Duration) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(health_url(port)).send().await?;

    if response.status() == reqwest::StatusCode::OK {
        Ok(())
    } else {
        Err(HealthcheckError::Unhealthy(response.status()))
    }
}

#[cfg(test)]
#[path = "healthcheck_test.rs"]
mod tests;
