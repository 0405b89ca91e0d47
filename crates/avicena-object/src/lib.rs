#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use backend::StorageBackend;
pub use config::{StorageConfig, StorageScheme};
pub use error::{StorageError, StorageResult};
pub use store::{HeadObject, ObjectStore, PresignedUrl};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "avicena_object";
