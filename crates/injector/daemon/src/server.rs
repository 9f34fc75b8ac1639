//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::{InjectorConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use axum::Router;
use injector_registry::{
    InMemoryServiceStore, PostgresServiceStore, Registry, ResolutionCache, ServiceStore,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Injector daemon server
pub struct Server {
    config: InjectorConfig,
    registry: Arc<Registry>,
}

impl Server {
    /// Create a new server, connecting to the configured store.
    ///
    /// Failing to reach the store here is fatal; it is the only error that
    /// aborts the process.
    pub async fn new(config: InjectorConfig) -> DaemonResult<Self> {
        let store = connect_store(&config.storage).await?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server over an already constructed store
    pub fn with_store(config: InjectorConfig, store: Arc<dyn ServiceStore>) -> Self {
        let cache = Arc::new(ResolutionCache::with_config(&config.cache));
        let registry = Registry::new(store, cache)
            .with_store_timeout(config.registry.store_timeout());

        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn router(&self) -> Router {
        create_router(
            AppState::new(self.registry.clone()),
            self.config.server.enable_cors,
        )
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> DaemonResult<()> {
        let addr = listener.local_addr()?;
        let app = self.router();

        tracing::info!("Injector API listening on {}", addr);
        tracing::info!(
            backend = self.registry.store_backend(),
            store_timeout_ms = self.config.registry.store_timeout_ms,
            "Registry ready"
        );

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Injector daemon shutting down");
        Ok(())
    }
}

/// Build the store for the configured backend
async fn connect_store(config: &StorageConfig) -> DaemonResult<Arc<dyn ServiceStore>> {
    match config {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory store; registrations are lost on restart");
            Ok(Arc::new(InMemoryServiceStore::new()))
        }
        StorageConfig::Postgres {
            url,
            max_connections,
            connect_timeout_secs,
        } => {
            let store = PostgresServiceStore::connect(
                url,
                *max_connections,
                Duration::from_secs(*connect_timeout_secs),
            )
            .await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
