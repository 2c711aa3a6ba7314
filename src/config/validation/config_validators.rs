//! Core configuration validators
//!
//! This module provides validation implementations for the gateway, server
//! and batch configuration structures.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.batch.validate()?;

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.timeout == 0 {
            return Err("Server timeout must be greater than 0".to_string());
        }

        if self.timeout > 3600 {
            return Err("Server timeout should not exceed 1 hour".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch configuration");

        for route in [&self.multipart_route, &self.json_route] {
            if !route.starts_with('/') {
                return Err(format!("Batch route '{}' must start with '/'", route));
            }
        }

        if self.multipart_route.eq_ignore_ascii_case(&self.json_route) {
            return Err(format!(
                "Multipart and JSON batch routes must differ (both '{}')",
                self.json_route
            ));
        }

        if self.max_sub_requests == Some(0) {
            return Err("max_sub_requests must be greater than 0".to_string());
        }

        Ok(())
    }
}
