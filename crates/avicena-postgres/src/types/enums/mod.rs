//! Custom enumeration types mapped to PostgreSQL enums.

// Attachment enums
pub mod attachment_source;
pub mod owner_kind;

pub use self::attachment_source::AttachmentSource;
pub use self::owner_kind::OwnerKind;
