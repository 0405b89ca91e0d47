//! Typed repositories over the schema tables.
//!
//! Repositories are traits implemented on [`crate::PgConnection`], so query
//! code runs against whichever connection the caller holds, pooled or not.

// Attachment queries
mod attachment;

pub use self::attachment::{AttachmentFilter, AttachmentRepository};
