//! Batch endpoint configuration

use super::*;
use crate::core::batch::ExecutionOrder;
use serde::{Deserialize, Serialize};

/// Batch endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Dispatch order for sub-requests
    #[serde(default)]
    pub execution_order: ExecutionOrder,
    /// Route of the `multipart/mixed` batch endpoint
    #[serde(default = "default_multipart_route")]
    pub multipart_route: String,
    /// Route of the JSON batch endpoint
    #[serde(default = "default_json_route")]
    pub json_route: String,
    /// Largest number of sub-requests accepted in one batch
    #[serde(default)]
    pub max_sub_requests: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            execution_order: ExecutionOrder::default(),
            multipart_route: default_multipart_route(),
            json_route: default_json_route(),
            max_sub_requests: None,
        }
    }
}

impl BatchConfig {
    /// Merge batch configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.execution_order != ExecutionOrder::default() {
            self.execution_order = other.execution_order;
        }
        if other.multipart_route != default_multipart_route() {
            self.multipart_route = other.multipart_route;
        }
        if other.json_route != default_json_route() {
            self.json_route = other.json_route;
        }
        if other.max_sub_requests.is_some() {
            self.max_sub_requests = other.max_sub_requests;
        }
        self
    }
}
