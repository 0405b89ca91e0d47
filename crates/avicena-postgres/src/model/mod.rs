//! Database models mapped to the schema tables.

// Attachment models
mod attachment;

pub use self::attachment::{Attachment, NewAttachment, UpdateAttachment};
