//! Storage error types.

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Invalid configuration or failed backend initialization.
    #[error("storage configuration error: {0}")]
    Config(String),

    /// Object not found under the given key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Permission denied by the backend.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Write operation failed.
    #[error("write failed: {0}")]
    Write(String),

    /// Presign operation failed or is unsupported by the backend.
    #[error("presign failed: {0}")]
    Presign(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(opendal::Error),
}

impl StorageError {
    /// Creates a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Creates a new permission denied error.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Creates a new write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Creates a new presign error.
    pub fn presign(msg: impl Into<String>) -> Self {
        Self::Presign(msg.into())
    }

    /// Returns true when the error means the key does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            ErrorKind::Unsupported => Self::Presign(err.to_string()),
            _ => Self::Backend(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_opendal_not_found() {
        let err = opendal::Error::new(opendal::ErrorKind::NotFound, "no such key");
        let err = StorageError::from(err);

        assert!(err.is_not_found());
        assert!(err.to_string().contains("object not found"));
    }

    #[test]
    fn maps_opendal_permission_denied() {
        let err = opendal::Error::new(opendal::ErrorKind::PermissionDenied, "forbidden");
        assert!(matches!(
            StorageError::from(err),
            StorageError::PermissionDenied(_)
        ));
    }

    #[test]
    fn maps_unexpected_errors_to_backend() {
        let err = opendal::Error::new(opendal::ErrorKind::Unexpected, "boom");
        let err = StorageError::from(err);

        assert!(matches!(err, StorageError::Backend(_)));
        assert!(!err.is_not_found());
    }
}
