//! Sub-request dispatch
//!
//! The batch coordinator only needs to run one request through the
//! application and get one response back. [`DispatchInvoker`] is that seam;
//! [`Pipeline`] is the in-process implementation shared with top-level
//! requests.

mod invoker;
mod pipeline;

pub use invoker::DispatchInvoker;
pub use pipeline::{HandlerFuture, Pipeline, RouteHandler, RouteRequest};
