//! Batch wire formats
//!
//! A [`BatchCodec`] turns a batch envelope into sub-requests and the
//! resulting sub-responses back into one response body. The coordinator picks
//! the codec whose supported media types contain the envelope's
//! `Content-Type`.

pub mod http_message;
mod json;
mod multipart;

pub use json::{JsonBatchCodec, JsonRequestMessage, JsonResponseMessage, parse_response_messages};
pub use multipart::MultipartBatchCodec;

use super::types::{BatchRequestEnvelope, BatchResponseEnvelope, SubRequest, SubResponse};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Decode/encode pair for one batch wire format
#[async_trait(?Send)]
pub trait BatchCodec: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Media types (without parameters) this codec accepts
    fn supported_content_types(&self) -> &[String];

    /// Whether `media_type` is accepted, ignoring case
    fn supports(&self, media_type: &str) -> bool {
        self.supported_content_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type))
    }

    /// Split the envelope into sub-requests, in wire order
    async fn decode(
        &self,
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<Vec<SubRequest>>;

    /// Encode `responses`, in order, into the outgoing batch response
    async fn encode(
        &self,
        responses: &[SubResponse],
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<BatchResponseEnvelope>;
}

/// Fail fast when the batch was cancelled
pub(crate) fn ensure_not_cancelled(cancel: &CancellationToken, stage: &str) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(GatewayError::cancelled(format!(
            "Batch cancelled during {}",
            stage
        )));
    }
    Ok(())
}
