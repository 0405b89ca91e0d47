#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for attachment pipeline events.
pub const TRACING_TARGET: &str = "avicena_attach";

mod engine;
mod error;
mod key;
mod metadata;
mod owner;
mod policy;

#[doc(hidden)]
pub mod prelude;

pub use crate::engine::{AttachmentEngine, DownloadTicket, UploadPayload};
pub use crate::error::{AttachError, AttachResult};
pub use crate::key::{StorageKey, sanitize_filename};
pub use crate::metadata::MetadataStore;
pub use crate::owner::{AttachmentOwner, Encounter, Patient, Transfer};
pub use crate::policy::AttachmentPolicy;
