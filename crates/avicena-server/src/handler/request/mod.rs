//! Request types for HTTP handlers.

mod attachments;
mod paths;
mod uploads;

pub use attachments::*;
pub use paths::*;
pub use uploads::*;
