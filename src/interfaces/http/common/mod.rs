//! Shared HTTP building blocks: error responses and the validating extractor

pub mod api_error;
pub mod validated_json;

pub use api_error::{ApiError, ErrorEntry, ErrorsBody, MessageBody};
pub use validated_json::ValidatedJson;
