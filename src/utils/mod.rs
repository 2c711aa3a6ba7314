//! Utility modules for the batch gateway

pub mod error; // Error handling

use uuid::Uuid;

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
