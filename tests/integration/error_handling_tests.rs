//! Error handling integration tests
//!
//! Batch-level failures surface as coded JSON errors; sub-request failures
//! never do.

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_error_body;
    use crate::common::{CountingInvoker, FaultingInvoker, app_state, app_state_with_invoker};
    use actix_web::{ResponseError, test as actix_test};
    use batch_gateway::config::Config;
    use batch_gateway::core::batch::ExecutionOrder;
    use batch_gateway::server::server::HttpServer;
    use batch_gateway::utils::error::{BatchErrorCode, GatewayError};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_missing_content() {
        let invoker = Arc::new(CountingInvoker::default());
        let app = actix_test::init_service(HttpServer::create_app(app_state_with_invoker(
            Config::default(),
            invoker.clone(),
        )))
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "application/json"))
            .insert_header(("x-request-id", "batch-missing"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body = actix_test::read_body(resp).await;
        assert_error_body(&body, "BatchRequestMissingContent", Some("batch-missing"));
        assert_eq!(invoker.calls(), 0);
    }

    #[actix_web::test]
    async fn test_missing_content_type() {
        let app = actix_test::init_service(HttpServer::create_app(app_state(Config::default()))).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/$batchJson")
            .set_payload("[]")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_error_body(&actix_test::read_body(resp).await, "BatchContentTypeMissing", None);
    }

    #[actix_web::test]
    async fn test_unsupported_media_type() {
        let app = actix_test::init_service(HttpServer::create_app(app_state(Config::default()))).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "text/plain"))
            .set_payload("GET /api/User")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_error_body(&actix_test::read_body(resp).await, "BatchMediaTypeNotSupported", None);
    }

    #[actix_web::test]
    async fn test_malformed_json_batch() {
        let app = actix_test::init_service(HttpServer::create_app(app_state(Config::default()))).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"method":"GET"}"#)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_error_body(&actix_test::read_body(resp).await, "BatchRequestMalformed", None);
    }

    #[actix_web::test]
    async fn test_sub_request_limit() {
        let mut config = Config::default();
        config.gateway.batch.max_sub_requests = Some(1);
        let app = actix_test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "application/json"))
            .set_payload(
                r#"[{"method":"GET","relativeUrl":"api/User/1"},{"method":"GET","relativeUrl":"api/User/2"}]"#,
            )
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_error_body(&actix_test::read_body(resp).await, "BatchRequestTooLarge", None);
    }

    #[actix_web::test]
    async fn test_dispatch_fault_fails_the_batch() {
        for order in [ExecutionOrder::Sequential, ExecutionOrder::NonSequential] {
            let mut config = Config::default();
            config.gateway.batch.execution_order = order;
            let invoker = Arc::new(FaultingInvoker::new(1));
            let app = actix_test::init_service(HttpServer::create_app(app_state_with_invoker(
                config,
                invoker.clone(),
            )))
            .await;
            let req = actix_test::TestRequest::post()
                .uri("/api/$batchJson")
                .insert_header(("content-type", "application/json"))
                .set_payload(
                    r#"[{"method":"GET","relativeUrl":"a"},{"method":"GET","relativeUrl":"b"},{"method":"GET","relativeUrl":"c"}]"#,
                )
                .to_request();
            let resp = actix_test::call_service(&app, req).await;

            assert_eq!(resp.status(), 500, "order {}", order);
            assert_error_body(&actix_test::read_body(resp).await, "BatchDispatchFault", None);
        }
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (GatewayError::Batch(BatchErrorCode::MissingContent), 400),
            (GatewayError::Batch(BatchErrorCode::MediaTypeNotSupported), 400),
            (GatewayError::decode("bad part"), 400),
            (GatewayError::dispatch_fault("boom"), 500),
            (GatewayError::cancelled("client went away"), 499),
            (GatewayError::not_found("nothing"), 404),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status().as_u16(), status, "{}", error);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let error = GatewayError::internal("database password is hunter2");
        let body = error.to_error_response(None);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("hunter2"));
    }
}
