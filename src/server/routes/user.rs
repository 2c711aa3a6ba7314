//! Sample `api/User` endpoint

use crate::core::batch::SubResponse;
use crate::core::dispatch::{Pipeline, RouteRequest};
use crate::core::models::User;
use crate::utils::error::Result;
use actix_web::http::{Method, StatusCode};
use futures::FutureExt;
use tracing::debug;

/// Register the user routes
pub fn configure_pipeline(pipeline: Pipeline) -> Pipeline {
    pipeline.route(Method::POST, "api/User", |req| create_user(req).boxed_local())
}

/// Echo the posted user with a fresh creation time
pub async fn create_user(req: RouteRequest) -> Result<SubResponse> {
    let user: User = req.json()?;
    debug!(
        request_id = %req.context.batch_id,
        "Creating user {}", user.username
    );
    SubResponse::json(StatusCode::OK, &user.created_now())
}
