//! Object-store contract shared by all backends.

use std::time::Duration;

use bytes::Bytes;

use crate::error::StorageResult;

/// Metadata reported by the store for a previously written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadObject {
    /// Object size in bytes, as reported by the store.
    pub size: i64,
    /// Content type, when the store reports one.
    pub content_type: Option<String>,
}

/// A time-boxed, pre-authorized download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// The fully signed URL; granting it grants the download.
    pub url: String,
}

/// Minimal object-store surface the attachment pipeline relies on.
///
/// Implementations must be safe to share across tasks. Keys are opaque
/// strings owned by the caller; the store never invents or rewrites them.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `content` under `key`, tagging it with `content_type`.
    ///
    /// `size` is the caller-declared byte count and must match
    /// `content.len()`; it travels separately so backends can set
    /// length headers without re-measuring the payload.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        size: i64,
        content: Bytes,
    ) -> StorageResult<()>;

    /// Fetches object metadata without downloading the payload.
    async fn head(&self, key: &str) -> StorageResult<HeadObject>;

    /// Mints a presigned GET URL valid for `expires_in`.
    ///
    /// The URL instructs browsers to save the payload as
    /// `download_filename` via a content-disposition override.
    async fn presign_get(
        &self,
        key: &str,
        download_filename: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl>;
}
