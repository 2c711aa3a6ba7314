//! Multipart batch endpoint tests

#[cfg(test)]
mod tests {
    use crate::common::{CountingInvoker, MultipartBatchBuilder, app_state, app_state_with_invoker};
    use actix_web::test;
    use batch_gateway::config::Config;
    use batch_gateway::server::server::HttpServer;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_multipart_batch_round_trip() {
        let app = test::init_service(HttpServer::create_app(app_state(Config::default()))).await;
        let batch = MultipartBatchBuilder::new()
            .request("POST", "/api/User", Some(r#"{"username":"tony"}"#))
            .request("GET", "/api/Order/1", None)
            .request("POST", "/api/User", Some(r#"{"username":"flint"}"#));
        let req = test::TestRequest::post()
            .uri("/api/$batch")
            .insert_header(("content-type", batch.content_type()))
            .set_payload(batch.build())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let content_type = resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("multipart/mixed; boundary="));

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert_eq!(body.matches("Content-Type: application/http; msgtype=response").count(), 3);

        let tony = body.find("\"username\":\"tony\"").unwrap();
        let missing = body.find("HTTP/1.1 404 Not Found").unwrap();
        let flint = body.find("\"username\":\"flint\"").unwrap();
        assert!(tony < missing && missing < flint);
    }

    #[actix_web::test]
    async fn test_json_endpoint_accepts_multipart() {
        let invoker = Arc::new(CountingInvoker::default());
        let app = test::init_service(HttpServer::create_app(app_state_with_invoker(
            Config::default(),
            invoker.clone(),
        )))
        .await;
        let batch = MultipartBatchBuilder::new()
            .request("GET", "/api/Values/1", None)
            .request("GET", "/api/Values/2", None);
        let req = test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", batch.content_type()))
            .set_payload(batch.build())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(invoker.calls(), 2);
    }

    #[actix_web::test]
    async fn test_multipart_endpoint_rejects_json() {
        let invoker = Arc::new(CountingInvoker::default());
        let app = test::init_service(HttpServer::create_app(app_state_with_invoker(
            Config::default(),
            invoker.clone(),
        )))
        .await;
        let req = test::TestRequest::post()
            .uri("/api/$batch")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"[{"method":"GET","relativeUrl":"api/Values"}]"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(invoker.calls(), 0);
    }
}
