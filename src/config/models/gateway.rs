//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Batch endpoint configuration
    #[serde(default)]
    pub batch: BatchConfig,
}

impl GatewayConfig {
    /// Defaults overridden by `GATEWAY_*` and `BATCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("GATEWAY_HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "GATEWAY_PORT")? {
            config.server.port = port;
        }
        if let Some(workers) = parse_var(&lookup, "GATEWAY_WORKERS")? {
            config.server.workers = Some(workers);
        }
        if let Some(timeout) = parse_var(&lookup, "GATEWAY_TIMEOUT")? {
            config.server.timeout = timeout;
        }
        if let Some(order) = lookup("BATCH_EXECUTION_ORDER") {
            config.batch.execution_order = order.parse()?;
        }
        if let Some(limit) = parse_var(&lookup, "BATCH_MAX_SUB_REQUESTS")? {
            config.batch.max_sub_requests = Some(limit);
        }

        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.batch = self.batch.merge(other.batch);
        self
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            GatewayError::Config(format!("Invalid value '{}' for {}", raw, name))
        }),
        None => Ok(None),
    }
}
