//! Sub-request dispatch under the configured execution order

use super::super::types::*;
use super::core::BatchHandler;
use super::utils::release_responses;
use crate::utils::error::{GatewayError, Result};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

impl BatchHandler {
    /// Invoke every sub-request; `responses[i]` answers `requests[i]`
    ///
    /// An invoker error aborts the batch: responses already produced are
    /// released and the fault is returned.
    pub async fn execute_requests(
        &self,
        requests: &[SubRequest],
        cancel: &CancellationToken,
    ) -> Result<Vec<SubResponse>> {
        match self.execution_order {
            ExecutionOrder::Sequential => self.execute_sequential(requests, cancel).await,
            ExecutionOrder::NonSequential => self.execute_concurrent(requests, cancel).await,
        }
    }

    async fn execute_sequential(
        &self,
        requests: &[SubRequest],
        cancel: &CancellationToken,
    ) -> Result<Vec<SubResponse>> {
        let mut responses = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            if cancel.is_cancelled() {
                release_responses(responses);
                return Err(GatewayError::cancelled(format!(
                    "Batch cancelled before sub-request {}",
                    index
                )));
            }

            debug!("Invoking sub-request {}: {} {}", index, request.method, request.url);
            match self.invoker.invoke(request, cancel).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    release_responses(responses);
                    return Err(into_fault(index, request, e));
                }
            }
        }

        Ok(responses)
    }

    async fn execute_concurrent(
        &self,
        requests: &[SubRequest],
        cancel: &CancellationToken,
    ) -> Result<Vec<SubResponse>> {
        debug!("Invoking {} sub-request(s) concurrently", requests.len());
        let results = join_all(
            requests
                .iter()
                .map(|request| self.invoker.invoke(request, cancel)),
        )
        .await;

        let mut responses = Vec::with_capacity(results.len());
        let mut fault = None;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(response) => responses.push(response),
                Err(e) => {
                    if fault.is_none() {
                        fault = Some(into_fault(index, &requests[index], e));
                    } else {
                        debug!("Sub-request {} also failed: {}", index, e);
                    }
                }
            }
        }

        match fault {
            Some(fault) => {
                release_responses(responses);
                Err(fault)
            }
            None => Ok(responses),
        }
    }
}

/// Cancellation passes through; anything else becomes a dispatch fault
fn into_fault(index: usize, request: &SubRequest, error: GatewayError) -> GatewayError {
    if error.is_batch_fault() {
        return error;
    }
    warn!(
        "Sub-request {} ({} {}) failed: {}",
        index, request.method, request.url, error
    );
    GatewayError::dispatch_fault(format!(
        "sub-request {} ({} {}) failed: {}",
        index,
        request.method,
        request.url.path(),
        error
    ))
}
