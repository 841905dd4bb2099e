//! HTTP server lifecycle: bind, serve, drain
//!
//! ```text
//! Starting --bind ok--> Listening --shutdown--> Draining --drained--> Stopped
//!     |                                             |
//!     +--bind error (fatal)                         +--deadline: ShutdownTimeout
//! ```
//!
//! Connections are accepted on one task and each is served on its own task.
//! When the shutdown future resolves the listener is dropped, every live
//! connection is asked to finish its current request and close, and the
//! drain is bounded by `ServerConfig::shutdown_timeout`.

use axum::{body::Body, Router};
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder as AutoBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::Service;
use tracing::{debug, error, info, warn};

use super::conn::TimeoutStream;
use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("graceful shutdown did not finish within {0:?}, in-flight connections abandoned")]
    ShutdownTimeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Listening,
    Draining,
    Stopped,
}

/// A bound listener plus its connection limits
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    state: watch::Sender<LifecycleState>,
}

impl Server {
    /// Bind the listener; failure here is fatal for the process
    pub async fn bind(addr: SocketAddr, config: ServerConfig) -> Result<Self, ServerError> {
        let (state, _) = watch::channel(LifecycleState::Starting);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        state.send_replace(LifecycleState::Listening);

        // Log after successful bind - server is actually listening
        info!(
            addr = %listener.local_addr().map_err(ServerError::LocalAddr)?,
            "HTTP server listening"
        );

        Ok(Self {
            listener,
            config,
            state,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Observe lifecycle transitions
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Serve `app` until `shutdown` resolves, then drain
    ///
    /// Returns `Ok(())` when every in-flight connection finished inside the
    /// drain window, `ServerError::ShutdownTimeout` otherwise.
    pub async fn serve<F>(self, app: Router, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let Server {
            listener,
            config,
            state,
        } = self;

        let mut builder = AutoBuilder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(config.header_read_timeout);
        let graceful = GracefulShutdown::new();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    let (socket, remote_addr) = match result {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };

                    if let Err(e) = socket.set_nodelay(true) {
                        warn!(error = %e, "Failed to set TCP_NODELAY");
                    }

                    let io = TokioIo::new(TimeoutStream::new(
                        socket,
                        config.idle_timeout,
                        config.write_timeout,
                    ));
                    let app = app.clone();
                    let service = hyper::service::service_fn(move |req: hyper::Request<Incoming>| {
                        let mut app = app.clone();
                        async move { app.call(req.map(Body::new)).await }
                    });

                    let conn = builder.serve_connection_with_upgrades(io, service);
                    let conn = graceful.watch(conn.into_owned());

                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            debug!(%remote_addr, error = %e, "Connection closed");
                        }
                    });
                }
                _ = &mut shutdown => {
                    break;
                }
            }
        }

        drop(listener);
        state.send_replace(LifecycleState::Draining);
        info!(
            timeout_secs = config.shutdown_timeout.as_secs_f64(),
            "Stopped accepting connections, draining in-flight requests"
        );

        let drained = tokio::time::timeout(config.shutdown_timeout, graceful.shutdown()).await;
        state.send_replace(LifecycleState::Stopped);

        match drained {
            Ok(()) => {
                info!("All connections drained");
                Ok(())
            }
            Err(_) => {
                error!(
                    timeout_secs = config.shutdown_timeout.as_secs_f64(),
                    "Forced shutdown: connections still open after drain timeout"
                );
                Err(ServerError::ShutdownTimeout(config.shutdown_timeout))
            }
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_tests;
