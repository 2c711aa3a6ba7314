//! `multipart/mixed` batch format, one `application/http` message per part

use super::http_message::{parse_request, resolve_target, write_response};
use super::{BatchCodec, ensure_not_cancelled};
use crate::core::batch::types::{
    BatchRequestEnvelope, BatchResponseEnvelope, SubRequest, SubResponse,
};
use crate::utils::error::{GatewayError, Result};
use actix_multipart::{Field, Multipart};
use actix_web::error::PayloadError;
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

const HTTP_MESSAGE_TYPE: &str = "application/http";

/// Codec for `multipart/mixed` batches
#[derive(Debug, Clone)]
pub struct MultipartBatchCodec {
    content_types: Vec<String>,
}

impl MultipartBatchCodec {
    pub fn new() -> Self {
        Self {
            content_types: vec!["multipart/mixed".to_string()],
        }
    }

    /// A fresh response boundary
    fn boundary() -> String {
        format!("batchresponse_{}", Uuid::new_v4())
    }
}

impl Default for MultipartBatchCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject parts that declare something other than an HTTP request
fn check_part_type(index: usize, field: &Field) -> Result<()> {
    let Some(mime) = field.content_type() else {
        return Ok(());
    };
    if !mime.essence_str().eq_ignore_ascii_case(HTTP_MESSAGE_TYPE) {
        return Err(GatewayError::decode(format!(
            "Part {}: unsupported content type '{}'",
            index, mime
        )));
    }
    if let Some(msgtype) = mime.get_param("msgtype") {
        if !msgtype.as_str().eq_ignore_ascii_case("request") {
            return Err(GatewayError::decode(format!(
                "Part {}: expected msgtype=request, found '{}'",
                index, msgtype
            )));
        }
    }
    Ok(())
}

/// Prefix a decode failure with the part it came from
fn at_part(index: usize, error: GatewayError) -> GatewayError {
    match error {
        GatewayError::Decode(message) => {
            GatewayError::decode(format!("Part {}: {}", index, message))
        }
        other => other,
    }
}

async fn read_field(index: usize, field: &mut Field) -> Result<Bytes> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| GatewayError::decode(format!("Part {}: unreadable: {}", index, e)))?;
        data.extend_from_slice(&chunk);
    }
    Ok(data.freeze())
}

#[async_trait(?Send)]
impl BatchCodec for MultipartBatchCodec {
    fn name(&self) -> &'static str {
        "multipart"
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
            .clone()
            .ok_or_else(|| GatewayError::decode("Multipart batch has no body"))?;

        let stream = futures::stream::once(async move { Ok::<Bytes, PayloadError>(body) });
        let mut multipart = Multipart::new(&envelope.headers, stream);

        let mut requests = Vec::new();
        while let Some(item) = multipart.next().await {
            let index = requests.len();
            ensure_not_cancelled(cancel, "decode")?;

            let mut field = item.map_err(|e| {
                GatewayError::decode(format!("Invalid multipart body at part {}: {}", index, e))
            })?;
            check_part_type(index, &field)?;
            let raw = read_field(index, &mut field).await?;

            let parsed = parse_request(&raw).map_err(|e| at_part(index, e))?;
            let url = resolve_target(&parsed.target, &parsed.headers, &envelope.url)
                .map_err(|e| at_part(index, e))?;

            let mut request = SubRequest::new(parsed.method, url, envelope.context.clone());
            request.headers = parsed.headers;
            request.body = parsed.body;

            debug!(
                batch_id = %envelope.context.batch_id,
                "Decoded multipart sub-request {}: {} {}", index, request.method, request.url
            );
            requests.push(request);
        }

        Ok(requests)
    }

    async fn encode(
        &self,
        responses: &[SubResponse],
        _envelope: &BatchRequestEnvelope,
        cancel: &CancellationToken,
    ) -> Result<BatchResponseEnvelope> {
        ensure_not_cancelled(cancel, "encode")?;
        let boundary = Self::boundary();
        let mut out = BytesMut::new();

        for response in responses {
            out.put_slice(format!("--{}\r\n", boundary).as_bytes());
            out.put_slice(b"Content-Type: application/http; msgtype=response\r\n\r\n");
            write_response(response, &mut out);
            out.put_slice(b"\r\n");
        }
        out.put_slice(format!("--{}--\r\n", boundary).as_bytes());

        Ok(BatchResponseEnvelope::ok(
            format!("multipart/mixed; boundary=\"{}\"", boundary),
            out.freeze(),
        ))
    }
}
