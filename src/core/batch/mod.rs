//! Batch request coordination
//!
//! One inbound HTTP request carries many logical sub-requests. The
//! [`BatchHandler`] validates the envelope, decodes it with the matching
//! [`BatchCodec`], dispatches every sub-request through a
//! [`DispatchInvoker`](crate::core::dispatch::DispatchInvoker) and encodes the
//! sub-responses, in order, into a single response.

pub mod codec;
mod processor;
mod types;


// Re-export all public types
pub use codec::{
    BatchCodec, JsonBatchCodec, JsonRequestMessage, JsonResponseMessage, MultipartBatchCodec,
    parse_response_messages,
};
pub use processor::core::BatchHandler;
pub use types::{
    BatchContext, BatchRequestEnvelope, BatchResponseEnvelope, ExecutionOrder, Resources,
    SubRequest, SubResponse,
};
