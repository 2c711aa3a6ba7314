//! # batch-gateway
//!
//! HTTP batch gateway: one inbound request carries many logical sub-requests,
//! each dispatched through the same in-process pipeline as a top-level
//! request, with the sub-responses re-encoded, in order, into one response.
//!
//! ## Features
//!
//! - **Two wire formats**: `multipart/mixed` (one `application/http` message
//!   per part) and a flat JSON array of `{method, relativeUrl, body}`
//! - **Execution order**: strictly sequential or concurrent, responses always
//!   in request order
//! - **Deterministic cleanup**: every sub-request and sub-response is released
//!   on success, fault and cancellation alike
//! - **Cancellation**: a client disconnect cancels the whole batch
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use batch_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    BatchCodec, BatchContext, BatchHandler, BatchRequestEnvelope, BatchResponseEnvelope,
    ExecutionOrder, JsonBatchCodec, MultipartBatchCodec, SubRequest, SubResponse,
};
pub use core::dispatch::{DispatchInvoker, Pipeline, RouteRequest};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// Batch gateway server
pub struct Gateway {
    config: Config,
    server: server::server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::server::HttpServer::new(&config)?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting batch gateway");
        info!("Configuration: {:#?}", self.config);

        self.server.start().await?;

        Ok(())
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build metadata recorded by `build.rs`
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
