//! Prelude module for convenient imports.

pub use crate::backend::StorageBackend;
pub use crate::config::{StorageConfig, StorageScheme};
pub use crate::error::{StorageError, StorageResult};
pub use crate::store::{HeadObject, ObjectStore, PresignedUrl};
