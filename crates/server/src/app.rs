//! Main application structure and lifecycle management

use crate::{api::ApiServer, log_store::LogStore};
use anyhow::{Context, Result};
use config::{Environment, ServerConfig};
use logger::Logger;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared, read-only application state plus the log buffer
#[derive(Debug)]
pub struct AppState {
    pub environment: Environment,
    pub logger: Logger,
    pub log_store: LogStore,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(environment: Environment, logger: Logger) -> Self {
        Self {
            environment,
            logger,
            log_store: LogStore::new(),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Main application that coordinates all components
pub struct Application {
    state: Arc<AppState>,
    api_server: ApiServer,
}

impl Application {
    /// Create a new application from an already initialized environment
    pub fn new(environment: Environment, server_config: &ServerConfig) -> Result<Self> {
        info!("Initializing application components...");

        let validated = environment.validated();
        let logger = Logger::new(environment.kind(), validated.log_level);
        let state = Arc::new(AppState::new(environment, logger));

        let api_server = ApiServer::new(state.clone(), server_config)
            .context("Failed to create API server")?;

        info!("Application components initialized successfully");

        Ok(Self { state, api_server })
    }

    /// Serve until the shutdown future resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let profile = self.state.environment.resolver().active_config();
        self.state.logger.info(
            &format!("{} v{} starting", profile.app.name, profile.app.version),
            None,
        );

        self.api_server.run(shutdown).await.context("API server error")?;

        self.state.logger.info("Application shutdown complete", None);
        Ok(())
    }
}
