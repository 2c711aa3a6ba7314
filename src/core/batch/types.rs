//! Batch request and response representations

use crate::utils::error::{GatewayError, Result};
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use actix_web::http::{Method, StatusCode};
use actix_web::mime::Mime;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Order in which the sub-requests of a batch are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOrder {
    /// One sub-request at a time, in input order
    #[default]
    #[serde(alias = "Sequential")]
    Sequential,
    /// All sub-requests at once, results kept in input order
    #[serde(alias = "NonSequential", alias = "non-sequential")]
    NonSequential,
}

impl ExecutionOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionOrder::Sequential => "sequential",
            ExecutionOrder::NonSequential => "non_sequential",
        }
    }
}

impl fmt::Display for ExecutionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionOrder {
    type Err = GatewayError;

    fn from_str(value: &str) -> Result<Self> {
        if let Ok(number) = value.trim().parse::<u8>() {
            return ExecutionOrder::try_from(number);
        }
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(ExecutionOrder::Sequential),
            "non_sequential" | "nonsequential" => Ok(ExecutionOrder::NonSequential),
            other => Err(GatewayError::config(format!(
                "Invalid execution order '{}': expected 'sequential' or 'non_sequential'",
                other
            ))),
        }
    }
}

impl TryFrom<u8> for ExecutionOrder {
    type Error = GatewayError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ExecutionOrder::Sequential),
            1 => Ok(ExecutionOrder::NonSequential),
            other => Err(GatewayError::config(format!(
                "Invalid execution order value {}",
                other
            ))),
        }
    }
}

/// Owned handles released together when a sub-request or sub-response is disposed
#[derive(Default)]
pub struct Resources {
    items: Vec<Box<dyn Any + Send>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `resource` alive until the owner is disposed
    pub fn attach<T: Send + 'static>(&mut self, resource: T) {
        self.items.push(Box::new(resource));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("count", &self.items.len())
            .finish()
    }
}

/// Read-only properties of the batch that every sub-request can see
#[derive(Debug, Clone)]
pub struct BatchContext {
    /// Correlation id, reused from `x-request-id` when the client sent one
    pub batch_id: String,
    /// Address of the connection that carried the batch
    pub peer_addr: Option<SocketAddr>,
    /// When the batch arrived
    pub received_at: DateTime<Utc>,
    /// Free-form properties shared with every sub-request
    pub properties: HashMap<String, String>,
}

impl BatchContext {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            peer_addr: None,
            received_at: Utc::now(),
            properties: HashMap::new(),
        }
    }

    pub fn with_peer_addr(mut self, peer_addr: Option<SocketAddr>) -> Self {
        self.peer_addr = peer_addr;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Default for BatchContext {
    fn default() -> Self {
        Self::new(crate::utils::generate_request_id())
    }
}

/// The single inbound HTTP request carrying a batch payload
pub struct BatchRequestEnvelope {
    pub method: Method,
    /// Absolute URL of the batch endpoint
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub context: Arc<BatchContext>,
    disposables: Mutex<Vec<Box<dyn Any + Send>>>,
}

impl BatchRequestEnvelope {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Option<Bytes>) -> Self {
        Self {
            method,
            url,
            headers,
            // an empty payload is no payload
            body: body.filter(|b| !b.is_empty()),
            context: Arc::new(BatchContext::default()),
            disposables: Mutex::new(Vec::new()),
        }
    }

    pub fn with_context(mut self, context: BatchContext) -> Self {
        self.context = Arc::new(context);
        self
    }

    /// Raw `Content-Type` header, if any
    pub fn content_type_header(&self) -> Option<&HeaderValue> {
        self.headers.get(header::CONTENT_TYPE)
    }

    /// Parsed `Content-Type`; `None` when absent or unparsable
    pub fn mime_type(&self) -> Option<Mime> {
        self.content_type_header()
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Mime>().ok())
    }

    /// Keep `resource` alive until the batch response has been materialized
    pub fn register_for_dispose<T: Send + 'static>(&self, resource: T) {
        self.disposables.lock().push(Box::new(resource));
    }

    /// Number of resources awaiting release
    pub fn pending_disposals(&self) -> usize {
        self.disposables.lock().len()
    }

    /// Release everything registered so far, returning how many were released
    pub fn release_resources(&self) -> usize {
        let released: Vec<_> = std::mem::take(&mut *self.disposables.lock());
        let count = released.len();
        drop(released);
        if count > 0 {
            debug!(
                batch_id = %self.context.batch_id,
                "Released {} batch resource group(s)", count
            );
        }
        count
    }
}

impl fmt::Debug for BatchRequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRequestEnvelope")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers.len())
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("batch_id", &self.context.batch_id)
            .finish()
    }
}

/// One logical request decoded from a batch
#[derive(Debug)]
pub struct SubRequest {
    pub method: Method,
    /// Absolute URL the request is routed by
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub context: Arc<BatchContext>,
    pub resources: Resources,
}

impl SubRequest {
    pub fn new(method: Method, url: Url, context: Arc<BatchContext>) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            context,
            resources: Resources::new(),
        }
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Path component of the URL, without the leading slash
    pub fn relative_path(&self) -> &str {
        self.url.path().trim_start_matches('/')
    }

    /// Release the request and everything attached to it
    pub fn dispose(self) {
        drop(self);
    }
}

/// Outcome of invoking one sub-request
#[derive(Debug)]
pub struct SubResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub resources: Resources,
}

impl SubResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
            resources: Resources::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// JSON body with `application/json; charset=utf-8`
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(status)
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )
            .with_body(body))
    }

    /// Coded response for a pipeline error; the error becomes an application outcome
    pub fn from_error(error: &GatewayError, request_id: Option<String>) -> Self {
        use actix_web::ResponseError;

        let status = error.status_code();
        match Self::json(status, &error.to_error_response(request_id)) {
            Ok(response) => response,
            Err(_) => Self::new(status),
        }
    }

    /// Response body as text, if any
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Release the response and everything attached to it
    pub fn dispose(self) {
        drop(self);
    }
}

/// The single outgoing response carrying every encoded sub-response
#[derive(Debug, Clone)]
pub struct BatchResponseEnvelope {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl BatchResponseEnvelope {
    pub fn ok(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: content_type.into(),
            body: body.into(),
        }
    }
}
