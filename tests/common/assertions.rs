//! Custom test assertions
//!
//! Provides domain-specific assertions for batch gateway responses.

use batch_gateway::utils::error::ErrorResponse;

/// Assert an error body carries `code` and, when given, the request id
pub fn assert_error_body(body: &[u8], code: &str, request_id: Option<&str>) {
    let error: ErrorResponse = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "Expected an error body, got {:?}: {}",
            String::from_utf8_lossy(body),
            e
        )
    });
    assert_eq!(error.error.code, code, "unexpected error code");
    if let Some(request_id) = request_id {
        assert_eq!(error.error.request_id.as_deref(), Some(request_id));
    }
}
