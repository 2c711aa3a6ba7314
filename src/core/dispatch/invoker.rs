//! Dispatch invoker capability

use crate::core::batch::{SubRequest, SubResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Runs one sub-request through the request-handling pipeline
///
/// An `Ok` response with any status code is a normal outcome. `Err` means the
/// invocation itself failed and aborts the whole batch. Implementations may be
/// called concurrently for distinct requests.
#[async_trait(?Send)]
pub trait DispatchInvoker: Send + Sync {
    async fn invoke(&self, request: &SubRequest, cancel: &CancellationToken)
    -> Result<SubResponse>;
}
