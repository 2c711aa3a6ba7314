//! Error Handling utilities
//!
//! This module provides the gateway error type and its HTTP mapping.

pub mod error;

pub use error::*;
