//! JSON batch endpoint tests

#[cfg(test)]
mod tests {
    use crate::common::{UserFactory, app_state, json_batch_body};
    use actix_web::test;
    use batch_gateway::config::Config;
    use batch_gateway::core::batch::{ExecutionOrder, JsonResponseMessage};
    use batch_gateway::core::models::User;
    use batch_gateway::server::server::HttpServer;

    async fn post_json_batch(config: Config, body: String) -> Vec<JsonResponseMessage> {
        let app = test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn test_tony_and_flint_are_echoed() {
        let body = json_batch_body(&[UserFactory::tony(), UserFactory::flint()]);
        let responses = post_json_batch(Config::default(), body).await;

        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.code == 200));

        let tony: User = serde_json::from_str(responses[0].body.as_deref().unwrap()).unwrap();
        let flint: User = serde_json::from_str(responses[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(tony.username, "tony");
        assert_eq!(flint.username, "flint");
        assert!(
            responses[0].headers["Content-Type"].starts_with("application/json"),
            "headers: {:?}",
            responses[0].headers
        );
    }

    #[actix_web::test]
    async fn test_concurrent_execution_keeps_order() {
        let mut config = Config::default();
        config.gateway.batch.execution_order = ExecutionOrder::NonSequential;

        let users: Vec<User> = (0..8).map(|_| UserFactory::random()).collect();
        let responses = post_json_batch(config, json_batch_body(&users)).await;

        assert_eq!(responses.len(), users.len());
        for (user, response) in users.iter().zip(&responses) {
            let echoed: User = serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
            assert_eq!(echoed.username, user.username);
        }
    }

    #[actix_web::test]
    async fn test_sub_request_failures_are_outcomes() {
        let body = r#"[
            {"method":"POST","relativeUrl":"api/User","body":"not a user"},
            {"method":"GET","relativeUrl":"api/Order/1"},
            {"method":"DELETE","relativeUrl":"api/User"}
        ]"#;
        let responses = post_json_batch(Config::default(), body.to_string()).await;

        let codes: Vec<u16> = responses.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![400, 404, 405]);
        assert_eq!(responses[2].headers["Allow"], "POST");
    }

    #[actix_web::test]
    async fn test_empty_array_yields_empty_array() {
        let responses = post_json_batch(Config::default(), "[]".to_string()).await;
        assert!(responses.is_empty());
    }

    #[actix_web::test]
    async fn test_text_json_is_accepted() {
        let app = test::init_service(HttpServer::create_app(app_state(Config::default()))).await;
        let req = test::TestRequest::post()
            .uri("/api/$batchJson")
            .insert_header(("content-type", "text/json; charset=utf-8"))
            .set_payload(json_batch_body(&[UserFactory::tony()]))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }
}
