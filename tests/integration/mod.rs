//! Integration tests for batch-gateway
//!
//! These tests drive the full actix application through its HTTP surface.

pub mod config_validation_tests;
pub mod error_handling_tests;
pub mod json_batch_tests;
pub mod multipart_batch_tests;
