//! Tests for configuration validation
//!
//! This module contains all tests for the validation logic.

#[cfg(test)]
mod tests {
    use super::super::trait_def::Validate;
    use crate::config::models::*;

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 8080;
        config.host = "".to_string();
        assert!(config.validate().is_err());

        config.host = "localhost".to_string();
        config.workers = Some(0);
        assert!(config.validate().is_err());

        config.workers = Some(4);
        config.timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_config_validation() {
        let mut config = BatchConfig::default();
        assert!(config.validate().is_ok());

        config.json_route = "api/$batchJson".to_string();
        assert!(config.validate().is_err());

        config.json_route = "/API/$BATCH".to_string();
        assert!(config.validate().is_err());

        config.json_route = default_json_route();
        config.max_sub_requests = Some(0);
        assert!(config.validate().is_err());

        config.max_sub_requests = Some(100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_config_validation() {
        let mut config = GatewayConfig::default();
        assert!(config.validate().is_ok());

        config.server.max_body_size = 0;
        assert!(config.validate().is_err());
    }
}
