//! JSON batch format
//!
//! Requests are a flat array of `{method, relativeUrl, body}` objects and
//! responses a flat array of `{code, headers, body}` objects, in the same
//! order.

use super::http_message::canonical_name;
use super::{BatchCodec, ensure_not_cancelled};
use crate::core::batch::types::{
    BatchRequestEnvelope, BatchResponseEnvelope, SubRequest, SubResponse,
};
use crate::utils::error::{GatewayError, Result};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderName, HeaderValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// One element of a JSON batch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRequestMessage {
    pub method: String,
    #[serde(rename = "relativeUrl")]
    pub relative_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// One element of a JSON batch response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResponseMessage {
    pub code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl JsonResponseMessage {
    fn from_response(response: &SubResponse) -> Self {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for name in response.headers.keys() {
            let joined = response
                .headers
                .get_all(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            headers.insert(canonical_name(name), joined);
        }

        Self {
            code: response.status.as_u16(),
            headers,
            body: response.body_text(),
        }
    }
}

/// Entity headers of the envelope's payload; only request headers carry over
/// to sub-requests, and `Transfer-Encoding` counts as a request header
fn is_content_header(name: &HeaderName) -> bool {
    *name == header::CONTENT_TYPE
        || *name == header::CONTENT_LENGTH
        || *name == header::CONTENT_ENCODING
        || *name == header::CONTENT_LANGUAGE
        || *name == header::CONTENT_LOCATION
        || *name == header::CONTENT_DISPOSITION
        || *name == header::CONTENT_RANGE
}

/// Codec for `application/json` and `text/json` batches
#[derive(Debug, Clone)]
pub struct JsonBatchCodec {
    content_types: Vec<String>,
}

impl JsonBatchCodec {
    pub fn new() -> Self {
        Self {
            content_types: vec!["application/json".to_string(), "text/json".to_string()],
        }
    }

    fn build_request(
        &self,
        index: usize,
        message: JsonRequestMessage,
        envelope: &BatchRequestEnvelope,
    ) -> Result<SubRequest> {
        let method = Method::from_bytes(message.method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                GatewayError::decode(format!(
                    "Sub-request {}: invalid method '{}'",
                    index, message.method
                ))
            })?;
        // rooted at "/"; a leading slash in relativeUrl makes a network-path reference
        let url = envelope
            .url
            .join(&format!("/{}", message.relative_url))
            .map_err(|e| {
                GatewayError::decode(format!(
                    "Sub-request {}: invalid relativeUrl '{}': {}",
                    index, message.relative_url, e
                ))
            })?;

        let mut request = SubRequest::new(method, url, envelope.context.clone());
        for (name, value) in envelope.headers.iter() {
            if !is_content_header(name) {
                request.headers.append(name.clone(), value.clone());
            }
        }

        match message.body {
            None | Some(serde_json::Value::Null) => {}
            Some(body) => {
                let body = serde_json::to_vec(&body)?;
                request.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                );
                request.body = Some(body.into());
            }
        }

        debug!(
            batch_id = %envelope.context.batch_id,
            "Decoded JSON sub-request {}: {} {}", index, request.method, request.url
        );
        Ok(request)
    }
}

impl Default for JsonBatchCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl BatchCodec for JsonBatchCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_content_types(&self) -> &[String] {
        &self.content_types
    }

    async fn decode(
        &self,
        envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<Vec<SubRequest>> {
        ensure_not_cancelled(cancel, "decode")?;
        let body = envelope
            .body
            .as_ref()
            .ok_or_else(|| GatewayError::decode("JSON batch has no body"))?;

        let messages: Vec<JsonRequestMessage> = serde_json::from_slice(body)
            .map_err(|e| GatewayError::decode(format!("Invalid JSON batch: {}", e)))?;

        messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| self.build_request(index, message, envelope))
            .collect()
    }

    async fn encode(
        &self,
        responses: &[SubResponse],
        _envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<BatchResponseEnvelope> {
        ensure_not_cancelled(cancel, "encode")?;
        let messages: Vec<JsonResponseMessage> = responses
            .iter()
            .map(JsonResponseMessage::from_response)
            .collect();
        let body = serde_json::to_vec(&messages)?;
        Ok(BatchResponseEnvelope::ok(JSON_CONTENT_TYPE, body))
    }
}

/// Decode a JSON batch response body back into its elements
pub fn parse_response_messages(body: &[u8]) -> Result<Vec<JsonResponseMessage>> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::decode(format!("Invalid JSON batch response: {}", e)))
}
