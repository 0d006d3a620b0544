mod config;
mod error;
mod metrics;
mod router;
mod search;
mod state;
mod upload;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::{
    config::{GatewayConfig, LogFormat, LogOutput},
    router::build_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Phase 1: Basic tracing so we can log during config loading
    // Uses set_default (thread-local) so it can be replaced by Phase 2's global subscriber
    let basic_tracing = init_tracing_basic();

    info!("Starting Log Reviewer Gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::load()
        .context("Failed to load configuration")?;

    config.validate()
        .context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level)
    drop(basic_tracing);
    init_tracing_from_config(&config)?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.server.bind_address);

    let addr: SocketAddr = config.server.bind_address
        .parse()
        .context("Invalid bind address")?;

    let state = AppState::new(config)
        .context("Failed to initialize application state")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("  - Upload: POST http://{}/logs/upload", addr);
    info!("  - Search: GET http://{}/logs/search", addr);
    info!("  - Health check: http://{}/health", addr);
    info!("✓ Listening on: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Phase 1: Basic tracing init so we can log during config loading.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gateway=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: Global subscriber from configuration. `RUST_LOG` still wins
/// over `logging.level`.
fn init_tracing_from_config(config: &GatewayConfig) -> Result<()> {
    use std::sync::Arc;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_file = match &config.logging.output {
        LogOutput::Stdout => None,
        LogOutput::File { path } => Some(Arc::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path))?,
        )),
    };

    match (&config.logging.format, log_file) {
        (LogFormat::Json, None) => {
            let layer = fmt::layer().json().with_target(true).with_thread_ids(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Json, Some(file)) => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_writer(file);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, None) => {
            let layer = fmt::layer().with_target(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, Some(file)) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
