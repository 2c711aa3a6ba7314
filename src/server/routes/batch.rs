//! Batch endpoints
//!
//! Each endpoint hands the raw request to its coordinator. The batch is
//! cancelled when the client goes away, and every resource the batch held is
//! released once the outgoing response has been built.

use crate::config::BatchConfig;
use crate::core::batch::{BatchHandler, BatchRequestEnvelope};
use crate::server::routes::{request_context, request_url};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Configure the two batch routes at their configured paths
pub fn configure_routes(cfg: &mut web::ServiceConfig, batch: &BatchConfig) {
    cfg.route(&batch.multipart_route, web::post().to(multipart_batch))
        .route(&batch.json_route, web::post().to(json_batch));
}

/// `multipart/mixed` batch endpoint
pub async fn multipart_batch(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    run_batch(&state.multipart_batch, &req, body).await
}

/// JSON batch endpoint; accepts `multipart/mixed` as well
pub async fn json_batch(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    run_batch(&state.json_batch, &req, body).await
}

async fn run_batch(handler: &BatchHandler, req: &HttpRequest, body: web::Bytes) -> HttpResponse {
    let context = request_context(req);
    let batch_id = context.batch_id.clone();

    let url = match request_url(req) {
        Ok(url) => url,
        Err(e) => {
            return HttpResponse::build(e.status_code()).json(e.to_error_response(Some(batch_id)));
        }
    };
    let envelope = BatchRequestEnvelope::new(
        req.method().clone(),
        url,
        req.headers().clone(),
        Some(body),
    )
    .with_context(context);

    // dropping this handler (client disconnect) cancels the batch
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let response = match handler.process_batch(&envelope, &cancel).await {
        Ok(encoded) => HttpResponse::build(encoded.status)
            .content_type(encoded.content_type)
            .body(encoded.body),
        Err(e) => HttpResponse::build(e.status_code()).json(e.to_error_response(Some(batch_id))),
    };
    let _ = guard.disarm();

    let released = envelope.release_resources();
    debug!("Batch response built, {} resource group(s) released", released);
    response
}
