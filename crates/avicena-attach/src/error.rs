//! Error types for the attachment pipeline.

use avicena_object::StorageError;
use avicena_postgres::PgError;
use uuid::Uuid;

/// Error type for attachment ingestion and retrieval operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "attachment errors should be handled appropriately"]
pub enum AttachError {
    /// Upload policy rejects the declared MIME type.
    #[error("MIME type '{mime_type}' is not accepted for upload")]
    UnsupportedMediaType {
        /// Declared MIME type of the rejected upload.
        mime_type: String,
    },

    /// Upload policy rejects the payload size.
    #[error("Payload of {size_bytes} bytes is outside the accepted range of 1 to {max_bytes} bytes")]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes.
        size_bytes: i64,
        /// Maximum size the policy accepts.
        max_bytes: i64,
    },

    /// Policy configuration is unusable.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Writing the object to storage failed.
    #[error("Failed to store object under '{key}'")]
    StorageWriteFailed {
        /// Storage key of the failed write.
        key: String,
        /// Underlying storage error.
        source: StorageError,
    },

    /// The stored object does not match what was uploaded.
    #[error("Stored object '{key}' failed verification: {detail}")]
    IntegrityMismatch {
        /// Storage key of the object that failed verification.
        key: String,
        /// What differed between the upload and the stored object.
        detail: String,
    },

    /// No live attachment matches the given id.
    #[error("Attachment {attachment_id} was not found")]
    NotFound {
        /// Identifier the lookup was performed with.
        attachment_id: Uuid,
    },

    /// A storage operation other than the initial write failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Metadata persistence failed.
    #[error(transparent)]
    Metadata(#[from] PgError),
}

impl AttachError {
    /// Returns `true` if the upload policy caused the rejection.
    #[must_use]
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType { .. } | Self::PayloadTooLarge { .. }
        )
    }

    /// Returns `true` if no attachment matched the request.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Specialized [`Result`] alias for attachment operations.
pub type AttachResult<T, E = AttachError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejection_classification() {
        let rejected = AttachError::UnsupportedMediaType {
            mime_type: "image/gif".to_owned(),
        };
        assert!(rejected.is_policy_rejection());
        assert!(!rejected.is_not_found());

        let missing = AttachError::NotFound {
            attachment_id: Uuid::new_v4(),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_policy_rejection());
    }

    #[test]
    fn test_display_includes_limits() {
        let oversize = AttachError::PayloadTooLarge {
            size_bytes: 2048,
            max_bytes: 1024,
        };
        let message = oversize.to_string();
        assert!(message.contains("2048"));
        assert!(message.contains("1024"));
    }
}
