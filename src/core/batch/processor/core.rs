//! Core BatchHandler struct and public API methods

use super::super::codec::{BatchCodec, JsonBatchCodec, MultipartBatchCodec};
use super::super::types::*;
use crate::core::dispatch::DispatchInvoker;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates one batch: validate, decode, dispatch, encode
pub struct BatchHandler {
    /// Registered wire formats, searched in order
    pub(super) codecs: Vec<Arc<dyn BatchCodec>>,
    /// Runs each sub-request through the pipeline
    pub(super) invoker: Arc<dyn DispatchInvoker>,
    /// Sequential or concurrent dispatch
    pub(super) execution_order: ExecutionOrder,
    /// Upper bound on sub-requests per batch
    pub(super) max_sub_requests: Option<usize>,
}

impl BatchHandler {
    /// Handler with no codecs registered
    pub fn new(invoker: Arc<dyn DispatchInvoker>) -> Self {
        Self {
            codecs: Vec::new(),
            invoker,
            execution_order: ExecutionOrder::default(),
            max_sub_requests: None,
        }
    }

    /// Handler accepting `multipart/mixed`
    pub fn multipart(invoker: Arc<dyn DispatchInvoker>) -> Self {
        Self::new(invoker).with_codec(Arc::new(MultipartBatchCodec::new()))
    }

    /// Handler accepting JSON batches in addition to `multipart/mixed`
    pub fn json(invoker: Arc<dyn DispatchInvoker>) -> Self {
        Self::multipart(invoker).with_codec(Arc::new(JsonBatchCodec::new()))
    }

    /// Register another codec
    pub fn with_codec(mut self, codec: Arc<dyn BatchCodec>) -> Self {
        self.codecs.push(codec);
        self
    }

    pub fn with_execution_order(mut self, order: ExecutionOrder) -> Self {
        self.execution_order = order;
        self
    }

    pub fn with_max_sub_requests(mut self, limit: Option<usize>) -> Self {
        self.max_sub_requests = limit;
        self
    }

    pub fn execution_order(&self) -> ExecutionOrder {
        self.execution_order
    }

    pub fn set_execution_order(&mut self, order: ExecutionOrder) {
        self.execution_order = order;
    }

    /// Assign the execution order from untyped input such as `"non_sequential"` or `"1"`
    pub fn set_execution_order_from(&mut self, value: &str) -> Result<()> {
        self.execution_order = value.parse()?;
        Ok(())
    }

    /// Every media type accepted by the registered codecs
    pub fn supported_content_types(&self) -> Vec<String> {
        self.codecs
            .iter()
            .flat_map(|codec| codec.supported_content_types().iter().cloned())
            .collect()
    }

    /// Run one batch end to end
    ///
    /// Decoded sub-requests and produced sub-responses are registered on the
    /// envelope and stay alive until [`BatchRequestEnvelope::release_resources`].
    pub async fn process_batch(
        &self,
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<BatchResponseEnvelope> {
        let batch_id = envelope.context.batch_id.clone();
        let started = Instant::now();
        info!(
            batch_id = %batch_id,
            execution_order = %self.execution_order,
            "Processing batch {} {}", envelope.method, envelope.url.path()
        );

        if let Err(e) = self.validate_request(envelope) {
            warn!(batch_id = %batch_id, code = e.code(), "Batch rejected: {}", e);
            return Err(e);
        }

        let requests = self.parse_batch_requests(envelope, cancel).await?;
        let count = requests.len();

        let outcome = self.execute_requests(&requests, cancel).await;
        envelope.register_for_dispose(requests);
        let responses = match outcome {
            Ok(responses) => responses,
            Err(e) => {
                warn!(batch_id = %batch_id, code = e.code(), "Batch aborted: {}", e);
                return Err(e);
            }
        };

        let encoded = self
            .create_response_message(&responses, envelope, cancel)
            .await;
        envelope.register_for_dispose(responses);
        let encoded = encoded?;

        info!(
            batch_id = %batch_id,
            sub_requests = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch completed"
        );
        Ok(encoded)
    }

    /// Decode the envelope with the codec matching its media type
    pub async fn parse_batch_requests(
        &self,
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<Vec<SubRequest>> {
        let codec = self.select_codec(envelope)?;
        let requests = codec.decode(envelope, cancel).await?;

        if let Some(limit) = self.max_sub_requests {
            if requests.len() > limit {
                let count = requests.len();
                envelope.register_for_dispose(requests);
                warn!(
                    batch_id = %envelope.context.batch_id,
                    "Batch holds {} sub-requests, limit is {}", count, limit
                );
                return Err(GatewayError::Batch(
                    crate::utils::error::BatchErrorCode::TooManyRequests,
                ));
            }
        }

        info!(
            batch_id = %envelope.context.batch_id,
            codec = codec.name(),
            "Decoded {} sub-request(s)", requests.len()
        );
        Ok(requests)
    }

    /// Encode `responses` with the codec matching the envelope's media type
    pub async fn create_response_message(
        &self,
        responses: &[SubResponse],
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<BatchResponseEnvelope> {
        let codec = self.select_codec(envelope)?;
        codec.encode(responses, envelope, cancel).await
    }
}

impl std::fmt::Debug for BatchHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchHandler")
            .field(
                "codecs",
                &self.codecs.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("execution_order", &self.execution_order)
            .field("max_sub_requests", &self.max_sub_requests)
            .finish()
    }
}
