//! HTTP middleware implementations
//!
//! - Request ID tracking, shared with the batch correlation context

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware, RequestIdMiddlewareService};
