use anyhow::Context;
use infra_deployer::config::{Config, ServerConfig};
use infra_deployer::healthcheck;
use infra_deployer::server::{
    build_router, create_metrics, shutdown_channel, AppState, Server, TerminationSignals,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::parse_from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    init_logging(config.log_json);

    if config.healthcheck {
        return match healthcheck::probe(config.port, healthcheck::DEFAULT_TIMEOUT).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Healthcheck failed");
                ExitCode::FAILURE
            }
        };
    }

    match run(config).await {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server exited with error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        version = infra_deployer::VERSION,
        environment = %config.environment,
        port = config.port,
        "Starting {}",
        infra_deployer::SERVICE_NAME
    );

    let mut signals =
        TerminationSignals::install().context("failed to install signal handlers")?;

    let metrics = create_metrics().context("failed to create metrics registry")?;
    let state = AppState::new(metrics, config.environment.clone());
    let app = build_router(state);

    let server = Server::bind(config.listen_addr(), ServerConfig::default()).await?;

    let (shutdown_controller, shutdown_signal) = shutdown_channel();
    let server_handle = tokio::spawn(server.serve(app, shutdown_signal.recv()));

    let signal = signals.recv().await;
    info!(signal = signal, "Initiating graceful shutdown");
    shutdown_controller.shutdown();

    server_handle.await.context("server task panicked")??;
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
