//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{info, warn};

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `path`, falling back to environment variables when the file is absent
pub async fn load_config(path: &Path) -> Result<Config> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Config::from_file(path).await;
    }

    warn!(
        "Configuration file {:?} not found, using defaults and environment",
        path
    );
    Config::from_env()
}

/// Run the server with the configuration found at `config_path`
pub async fn run_server(config_path: &Path) -> Result<()> {
    info!("Starting batch gateway");

    let config = load_config(config_path).await?;
    let server = ServerBuilder::new().with_config(config.clone()).build()?;

    info!(
        "Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /version - Build information");
    info!(
        "   POST {} - multipart/mixed batch ({})",
        config.batch().multipart_route,
        config.batch().execution_order
    );
    info!(
        "   POST {} - JSON batch ({})",
        config.batch().json_route,
        config.batch().execution_order
    );
    info!("   POST /api/User - Create user");

    server.start().await
}
