//! Release helpers for partially completed batches

use super::super::types::SubResponse;
use tracing::debug;

/// Dispose every response, returning how many were released
pub(super) fn release_responses(responses: Vec<SubResponse>) -> usize {
    let count = responses.len();
    for response in responses {
        response.dispose();
    }
    if count > 0 {
        debug!("Released {} sub-response(s) after a failed batch", count);
    }
    count
}
