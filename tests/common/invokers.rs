//! Dispatch invoker fakes

use async_trait::async_trait;
use batch_gateway::core::batch::{SubRequest, SubResponse};
use batch_gateway::core::dispatch::DispatchInvoker;
use batch_gateway::utils::error::{GatewayError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Answers every request with its path and counts invocations
#[derive(Default)]
pub struct CountingInvoker {
    pub calls: AtomicUsize,
}

impl CountingInvoker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl DispatchInvoker for CountingInvoker {
    async fn invoke(
        &self,
        request: &SubRequest,
        _cancel: &CancellationToken,
    ) -> Result<SubResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SubResponse::ok().with_body(request.url.path().to_string()))
    }
}

/// Fails the invocation numbered `fail_at` (zero-based), answers the others
pub struct FaultingInvoker {
    pub fail_at: usize,
    pub calls: AtomicUsize,
}

impl FaultingInvoker {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait(?Send)]
impl DispatchInvoker for FaultingInvoker {
    async fn invoke(
        &self,
        request: &SubRequest,
        _cancel: &CancellationToken,
    ) -> Result<SubResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if index == self.fail_at {
            return Err(GatewayError::internal(format!(
                "upstream failure for {}",
                request.url.path()
            )));
        }
        Ok(SubResponse::ok())
    }
}
