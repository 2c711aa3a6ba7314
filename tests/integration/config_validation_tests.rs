//! Configuration loading tests

#[cfg(test)]
mod tests {
    use batch_gateway::config::{Config, GatewayConfig, Validate};
    use batch_gateway::core::batch::ExecutionOrder;
    use batch_gateway::server::builder::load_config;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_from_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
server:
  port: 9300
batch:
  execution_order: NonSequential
  json_route: /batch/json
"#,
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.server().port, 9300);
        assert_eq!(config.batch().execution_order, ExecutionOrder::NonSequential);
        assert_eq!(config.batch().json_route, "/batch/json");
        assert_eq!(config.batch().multipart_route, "/api/$batch");
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.yaml")).await;
        assert!(config.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_routes_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"batch:\n  multipart_route: /api/x\n  json_route: /api/x\n")
            .unwrap();

        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = Config::default();
        config.gateway.batch.max_sub_requests = Some(64);

        let yaml = config.to_yaml().unwrap();
        let parsed: GatewayConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.batch.max_sub_requests, Some(64));
        assert!(parsed.validate().is_ok());
    }
}
