//! Batch envelope validation and codec selection

use super::super::codec::BatchCodec;
use super::super::types::*;
use super::core::BatchHandler;
use crate::utils::error::{BatchErrorCode, GatewayError, Result};
use std::sync::Arc;

impl BatchHandler {
    /// Reject envelopes no codec can decode
    pub fn validate_request(&self, envelope: &BatchRequestEnvelope) -> Result<()> {
        if envelope.body.is_none() {
            return Err(GatewayError::Batch(BatchErrorCode::MissingContent));
        }

        if envelope.content_type_header().is_none() {
            return Err(GatewayError::Batch(BatchErrorCode::ContentTypeMissing));
        }

        self.select_codec(envelope).map(|_| ())
    }

    /// Codec accepting the envelope's media type, parameters ignored
    pub(super) fn select_codec(
        &self,
        envelope: &BatchRequestEnvelope,
    ) -> Result<&Arc<dyn BatchCodec>> {
        let mime = envelope
            .mime_type()
            .ok_or(GatewayError::Batch(BatchErrorCode::MediaTypeNotSupported))?;

        self.codecs
            .iter()
            .find(|codec| codec.supports(mime.essence_str()))
            .ok_or(GatewayError::Batch(BatchErrorCode::MediaTypeNotSupported))
    }
}
