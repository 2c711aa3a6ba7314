//! Error handling for the Gateway
//!
//! This module defines all error types used throughout the gateway.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Machine-readable reasons a batch envelope is rejected before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchErrorCode {
    /// The batch request carried no body
    MissingContent,
    /// The batch request carried no `Content-Type`
    ContentTypeMissing,
    /// No registered codec accepts the negotiated media type
    MediaTypeNotSupported,
    /// The batch holds more sub-requests than the configured limit
    TooManyRequests,
}

impl BatchErrorCode {
    /// Reason code reported in the error body
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchErrorCode::MissingContent => "BatchRequestMissingContent",
            BatchErrorCode::ContentTypeMissing => "BatchContentTypeMissing",
            BatchErrorCode::MediaTypeNotSupported => "BatchMediaTypeNotSupported",
            BatchErrorCode::TooManyRequests => "BatchRequestTooLarge",
        }
    }
}

impl std::fmt::Display for BatchErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Batch envelope rejected before any sub-request was decoded
    #[error("Batch request rejected: {0}")]
    Batch(BatchErrorCode),

    /// Malformed batch payload
    #[error("Malformed batch request: {0}")]
    Decode(String),

    /// A sub-request invocation failed instead of producing a response
    #[error("Batch dispatch failed: {0}")]
    DispatchFault(String),

    /// The batch was cancelled before it completed
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Method not allowed on an existing route
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Status used when the client abandoned the batch (nginx convention)
const CLIENT_CLOSED_REQUEST: u16 = 499;

impl GatewayError {
    /// Status code, machine-readable code and client-facing message
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            GatewayError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            GatewayError::Serialization(_) => (
                StatusCode::BAD_REQUEST,
                "SERIALIZATION_ERROR",
                self.to_string(),
            ),
            GatewayError::Batch(code) => (StatusCode::BAD_REQUEST, code.as_str(), self.to_string()),
            GatewayError::Decode(_) => (
                StatusCode::BAD_REQUEST,
                "BatchRequestMalformed",
                self.to_string(),
            ),
            GatewayError::DispatchFault(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "BatchDispatchFault",
                self.to_string(),
            ),
            GatewayError::Cancelled(_) => (
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST),
                "BatchRequestCancelled",
                self.to_string(),
            ),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            GatewayError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                self.to_string(),
            ),
            GatewayError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        self.parts().1
    }

    /// Standard JSON error body for this error
    pub fn to_error_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (_, code, message) = self.parts();
        ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id,
            },
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        // request_id is filled in by the batch route when it knows the context
        HttpResponse::build(self.status_code()).json(self.to_error_response(None))
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode(message.into())
    }

    pub fn dispatch_fault<S: Into<String>>(message: S) -> Self {
        Self::DispatchFault(message.into())
    }

    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error aborted the batch as a whole
    pub fn is_batch_fault(&self) -> bool {
        matches!(
            self,
            GatewayError::DispatchFault(_) | GatewayError::Cancelled(_)
        )
    }
}
