//! Injector Daemon - service registry with resolution caching
//!
//! The daemon provides:
//! - `GET /services/{id}` resolution with an in-process cache
//! - `POST /services` registration
//! - `/health` liveness and `/health/ready` store readiness

use clap::Parser;
use injector_daemon::config::{InjectorConfig, StorageConfig};
use injector_daemon::error::{DaemonError, DaemonResult};
use injector_daemon::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Injector Daemon CLI
#[derive(Parser)]
#[command(name = "injectord")]
#[command(about = "Injector - service registry with resolution caching", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "INJECTOR_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "INJECTOR_LISTEN_ADDR")]
    listen: Option<String>,

    /// PostgreSQL connection URL; the in-memory store is used when unset
    #[arg(long, env = "INJECTOR_STORE_URL")]
    store_url: Option<String>,

    /// Log level
    #[arg(long, env = "INJECTOR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "INJECTOR_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = InjectorConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(url) = cli.store_url {
        config.storage = StorageConfig::postgres(url);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        "Starting injector"
    );

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await
}
