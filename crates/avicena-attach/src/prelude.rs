//! Convenience re-exports of the most commonly used types.

pub use crate::engine::{AttachmentEngine, DownloadTicket, UploadPayload};
pub use crate::error::{AttachError, AttachResult};
pub use crate::key::{StorageKey, sanitize_filename};
pub use crate::metadata::MetadataStore;
pub use crate::owner::{AttachmentOwner, Encounter, Patient, Transfer};
pub use crate::policy::AttachmentPolicy;
