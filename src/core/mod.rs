//! Core functionality for the Gateway
//!
//! This module contains the batch coordinator, the in-process dispatch
//! pipeline and the sample domain models.

pub mod batch;
pub mod dispatch;
pub mod models;
