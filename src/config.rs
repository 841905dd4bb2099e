//! Process configuration
//!
//! Every option can be given as a flag or through the environment, so the
//! same binary works under `docker run -e PORT=...` and from a shell.

use clap::Parser;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Operational HTTP service exposing health, status, and metrics endpoints
#[derive(Parser, Debug, Clone)]
#[command(author, version = crate::VERSION, about, long_about = None)]
pub struct Config {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Deployment environment reported by /api/v1/status
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    /// Probe the local /health endpoint and exit 0 (healthy) or 1
    #[arg(long)]
    pub healthcheck: bool,
}

impl Config {
    /// Parse from an argument list, accepting the single-dash
    /// `-healthcheck` spelling used by container HEALTHCHECK directives.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = args.into_iter().map(|arg| {
            let arg = arg.into();
            if arg == "-healthcheck" {
                OsString::from("--healthcheck")
            } else {
                arg
            }
        });
        Self::try_parse_from(args)
    }

    /// Address the server binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Connection and drain limits for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Time allowed for a client to send the request head
    pub header_read_timeout: Duration,
    /// Time a response write may stall before the connection is dropped
    pub write_timeout: Duration,
    /// Time a connection may sit without any traffic
    pub idle_timeout: Duration,
    /// Upper bound on the graceful drain after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            header_read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(60),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
