//! In-process route table used for both top-level requests and sub-requests

use super::DispatchInvoker;
use crate::core::batch::{BatchContext, SubRequest, SubResponse};
use crate::utils::error::{GatewayError, Result};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::LocalBoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Future returned by a route handler
pub type HandlerFuture = LocalBoxFuture<'static, Result<SubResponse>>;

/// Route handler; errors are turned into coded responses by the pipeline
pub type RouteHandler = Arc<dyn Fn(RouteRequest) -> HandlerFuture + Send + Sync>;

/// Request handed to a route handler
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Values captured by `{name}` template segments
    pub params: HashMap<String, String>,
    pub context: Arc<BatchContext>,
}

impl RouteRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Deserialize the JSON body
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| GatewayError::bad_request("Request body is required"))?;
        serde_json::from_slice(body)
            .map_err(|e| GatewayError::bad_request(format!("Invalid JSON body: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
}

#[derive(Clone)]
struct Route {
    method: Method,
    template: String,
    segments: Vec<Segment>,
    handler: RouteHandler,
}

impl Route {
    /// Captured params when `path` matches; literals compare case-insensitively
    fn matches(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        if path.len() > self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match (segment, path.get(index)) {
                (Segment::Literal(literal), Some(actual)) => {
                    if !literal.eq_ignore_ascii_case(actual) {
                        return None;
                    }
                }
                (Segment::Param { name, .. }, Some(actual)) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
                (Segment::Param { optional: true, .. }, None) => {}
                (_, None) => return None,
            }
        }
        Some(params)
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    template
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => match name.strip_suffix('?') {
                Some(name) => Segment::Param {
                    name: name.to_string(),
                    optional: true,
                },
                None => Segment::Param {
                    name: name.to_string(),
                    optional: false,
                },
            },
            None => Segment::Literal(s.to_string()),
        })
        .collect()
}

/// Route table dispatching requests to registered handlers
#[derive(Clone, Default)]
pub struct Pipeline {
    routes: Vec<Route>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `template`, e.g. `api/User/{id?}`
    pub fn route<F>(mut self, method: Method, template: &str, handler: F) -> Self
    where
        F: Fn(RouteRequest) -> HandlerFuture + Send + Sync + 'static,
    {
        debug!("Registering route {} /{}", method, template.trim_matches('/'));
        self.routes.push(Route {
            method,
            template: template.to_string(),
            segments: parse_template(template),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route and run one request; routing and handler errors become responses
    pub async fn dispatch(&self, request: RouteRequest) -> SubResponse {
        let request_id = request.context.batch_id.clone();
        let path: Vec<&str> = request
            .url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let mut allowed = Vec::new();
        let mut selected = None;
        for route in &self.routes {
            if let Some(params) = route.matches(&path) {
                if route.method == request.method {
                    selected = Some((route, params));
                    break;
                }
                allowed.push(route.method.as_str());
            }
        }

        let Some((route, params)) = selected else {
            if allowed.is_empty() {
                debug!("No route for {} {}", request.method, request.url.path());
                return SubResponse::from_error(
                    &GatewayError::not_found(format!(
                        "No route matches '{}'",
                        request.url.path()
                    )),
                    Some(request_id),
                );
            }
            let allow = allowed.join(", ");
            let mut response = SubResponse::from_error(
                &GatewayError::MethodNotAllowed(format!(
                    "{} is not supported on '{}'",
                    request.method,
                    request.url.path()
                )),
                Some(request_id),
            );
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers.insert(header::ALLOW, value);
            }
            return response;
        };

        debug!(
            "Dispatching {} {} to route '{}'",
            request.method,
            request.url.path(),
            route.template
        );
        let handler = route.handler.clone();
        match handler(RouteRequest { params, ..request }).await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "Route handler failed");
                SubResponse::from_error(&error, Some(request_id))
            }
        }
    }
}

#[async_trait(?Send)]
impl DispatchInvoker for Pipeline {
    async fn invoke(
        &self,
        request: &SubRequest,
        cancel: &CancellationToken,
    ) -> Result<SubResponse> {
        if cancel.is_cancelled() {
            return Err(GatewayError::cancelled(format!(
                "{} {} was not started",
                request.method, request.url
            )));
        }

        let routed = RouteRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            params: HashMap::new(),
            context: request.context.clone(),
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(GatewayError::cancelled(format!(
                "{} {} was interrupted",
                request.method, request.url
            ))),
            response = self.dispatch(routed) => Ok(response),
        }
    }
}
