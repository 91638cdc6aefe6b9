//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use super::resource_registry::ResourceRegistry;
use crate::config::AppConfig;
use crate::core::store::RecordStore;
use crate::resource::ResourceHandler;
use crate::storage::InMemoryRecordStore;
use anyhow::Result;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::default_config())
///     .build()?;
/// ```
pub struct ServerBuilder {
    configs: Vec<AppConfig>,
    stores: HashMap<String, Arc<dyn RecordStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            stores: HashMap::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Add a configuration
    ///
    /// Several configurations are merged; server and auth settings come from
    /// the first one.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Use a specific store for a resource instead of a seeded in-memory one
    pub fn with_store(mut self, plural: &str, store: impl RecordStore + 'static) -> Self {
        self.stores.insert(plural.to_string(), Arc::new(store));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints that don't fit the CRUD pattern.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    ///
    /// Validates the merged configuration and creates one handler per
    /// resource. Resources without an explicit store get an in-memory store
    /// holding their seed records.
    pub fn build_host(mut self) -> Result<ServerHost> {
        let config = if self.configs.is_empty() {
            AppConfig::empty()
        } else {
            AppConfig::merge(std::mem::take(&mut self.configs))
        };
        config.validate()?;

        if let Some(unknown) = self
            .stores
            .keys()
            .find(|plural| config.find_resource(plural).is_none())
        {
            anyhow::bail!("Store registered for unknown resource '{}'", unknown);
        }

        let mut registry = ResourceRegistry::new();
        for resource in &config.resources {
            let store = match self.stores.remove(&resource.plural) {
                Some(store) => store,
                None => Arc::new(InMemoryRecordStore::with_records(resource.seed_records()?)?),
            };
            registry.register(ResourceHandler::new(resource.clone(), store));
        }

        tracing::debug!(resources = ?registry.resource_names(), "Registered resources");

        Ok(ServerHost::from_builder_components(config, registry)?)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
