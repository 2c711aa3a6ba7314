//! Batch coordinator
//!
//! This module provides the batch handler split into logical components:
//! - `core`: `BatchHandler` struct, configuration and the `process_batch` entry point
//! - `validation`: envelope validation and codec selection
//! - `execution`: sequential and concurrent dispatch of sub-requests
//! - `utils`: release of sub-responses on failure paths

pub mod core;
mod execution;
mod utils;
mod validation;
