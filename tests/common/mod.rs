//! Common test utilities for batch-gateway
//!
//! - Batch body builders and user fixtures
//! - Dispatch invoker fakes
//! - Application builders
//! - Custom assertions

pub mod assertions;
pub mod fixtures;
pub mod invokers;

pub use fixtures::{MultipartBatchBuilder, UserFactory, json_batch_body};
pub use invokers::{CountingInvoker, FaultingInvoker};

use actix_web::web;
use batch_gateway::config::Config;
use batch_gateway::core::batch::BatchHandler;
use batch_gateway::core::dispatch::{DispatchInvoker, Pipeline};
use batch_gateway::server::routes;
use batch_gateway::server::state::AppState;
use std::sync::Arc;

/// Application state with the real routes and `config`
pub fn app_state(config: Config) -> web::Data<AppState> {
    web::Data::new(AppState::new(config))
}

/// Application state whose batch endpoints dispatch through `invoker`
pub fn app_state_with_invoker(
    config: Config,
    invoker: Arc<dyn DispatchInvoker>,
) -> web::Data<AppState> {
    let order = config.batch().execution_order;
    web::Data::new(AppState {
        pipeline: Arc::new(routes::configure_pipeline(Pipeline::new())),
        multipart_batch: Arc::new(
            BatchHandler::multipart(invoker.clone()).with_execution_order(order),
        ),
        json_batch: Arc::new(BatchHandler::json(invoker).with_execution_order(order)),
        config: Arc::new(config),
    })
}
