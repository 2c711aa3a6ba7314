//! Request context helpers

use crate::core::batch::BatchContext;
use crate::server::middleware::REQUEST_ID_HEADER;
use crate::utils::error::{GatewayError, Result};
use crate::utils::generate_request_id;
use actix_web::HttpRequest;
use url::Url;

/// Absolute URL of the request as the client addressed it
pub fn request_url(req: &HttpRequest) -> Result<Url> {
    let connection = req.connection_info();
    let path = req
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");
    let raw = format!("{}://{}{}", connection.scheme(), connection.host(), path);
    Url::parse(&raw).map_err(|e| GatewayError::bad_request(format!("Invalid request URL: {}", e)))
}

/// Correlation context for the request, keyed by its `x-request-id`
pub fn request_context(req: &HttpRequest) -> BatchContext {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let mut context = BatchContext::new(request_id).with_peer_addr(req.peer_addr());
    if let Some(agent) = req
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        context = context.with_property("user_agent", agent);
    }
    context
}
