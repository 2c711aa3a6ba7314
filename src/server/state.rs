//! Application state shared across HTTP handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::config::Config;
use crate::core::batch::BatchHandler;
use crate::core::dispatch::{DispatchInvoker, Pipeline};
use crate::server::routes;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Top-level requests and batch sub-requests run through the same
/// [`Pipeline`]; each batch endpoint owns its coordinator.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// In-process route table
    pub pipeline: Arc<Pipeline>,
    /// Coordinator behind the multipart batch route
    pub multipart_batch: Arc<BatchHandler>,
    /// Coordinator behind the JSON batch route
    pub json_batch: Arc<BatchHandler>,
}

impl AppState {
    /// State serving the application routes
    pub fn new(config: Config) -> Self {
        Self::with_pipeline(config, routes::configure_pipeline(Pipeline::new()))
    }

    /// State dispatching sub-requests through `pipeline`
    pub fn with_pipeline(config: Config, pipeline: Pipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        let invoker: Arc<dyn DispatchInvoker> = pipeline.clone();
        let batch = config.batch();

        let multipart_batch = BatchHandler::multipart(invoker.clone())
            .with_execution_order(batch.execution_order)
            .with_max_sub_requests(batch.max_sub_requests);
        let json_batch = BatchHandler::json(invoker)
            .with_execution_order(batch.execution_order)
            .with_max_sub_requests(batch.max_sub_requests);

        Self {
            config: Arc::new(config),
            pipeline,
            multipart_batch: Arc::new(multipart_batch),
            json_batch: Arc::new(json_batch),
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
