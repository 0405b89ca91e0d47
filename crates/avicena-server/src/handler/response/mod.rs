//! Response types for HTTP handlers.

mod attachments;
mod error_response;
mod monitors;

pub use attachments::*;
pub use error_response::ErrorResponse;
pub use monitors::*;
