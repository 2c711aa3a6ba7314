//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod batch;
mod context;
pub mod dispatch;
pub mod health;
pub mod user;

use crate::core::dispatch::Pipeline;

pub use context::{request_context, request_url};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Register every application route on `pipeline`
pub fn configure_pipeline(pipeline: Pipeline) -> Pipeline {
    user::configure_pipeline(pipeline)
}
