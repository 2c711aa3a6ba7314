//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod batch;
pub mod gateway;
pub mod server;

// Re-export all configuration types
pub use batch::*;
pub use gateway::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Default route of the multipart batch endpoint
pub fn default_multipart_route() -> String {
    "/api/$batch".to_string()
}

/// Default route of the JSON batch endpoint
pub fn default_json_route() -> String {
    "/api/$batchJson".to_string()
}
