//! Top-level requests routed through the dispatch pipeline
//!
//! Requests that match no actix route are handed to the same [`Pipeline`]
//! batch sub-requests use.
//!
//! [`Pipeline`]: crate::core::dispatch::Pipeline

use crate::core::batch::{SubRequest, SubResponse};
use crate::core::dispatch::DispatchInvoker;
use crate::server::routes::{request_context, request_url};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fallback service: run the request through the pipeline
pub async fn dispatch_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let context = request_context(&req);
    let request_id = context.batch_id.clone();

    let url = match request_url(&req) {
        Ok(url) => url,
        Err(e) => {
            return HttpResponse::build(e.status_code()).json(e.to_error_response(Some(request_id)));
        }
    };

    let mut request = SubRequest::new(req.method().clone(), url, Arc::new(context));
    request.headers = req.headers().clone();
    if !body.is_empty() {
        request.body = Some(body);
    }

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let result = state.pipeline.invoke(&request, &cancel).await;
    let _ = guard.disarm();

    match result {
        Ok(response) => into_http_response(response),
        Err(e) => HttpResponse::build(e.status_code()).json(e.to_error_response(Some(request_id))),
    }
}

/// Actix response carrying the sub-response's status, headers and body
pub fn into_http_response(response: SubResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(response.status);
    for (name, value) in response.headers.iter() {
        builder.append_header((name.clone(), value.clone()));
    }
    match response.body {
        Some(body) => builder.body(body),
        None => builder.finish(),
    }
}
