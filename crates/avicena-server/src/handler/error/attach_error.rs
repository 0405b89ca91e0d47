//! Attachment pipeline to HTTP error conversion handlers.

use avicena_attach::AttachError;

use crate::handler::{Error, ErrorKind};

/// Tracing target for attachment pipeline error conversions.
const TRACING_TARGET: &str = "avicena_server::attach_errors";

impl From<AttachError> for Error<'static> {
    fn from(error: AttachError) -> Self {
        match error {
            AttachError::UnsupportedMediaType { mime_type } => ErrorKind::UnsupportedMediaType
                .with_context(format!("Content type: {mime_type}"))
                .with_resource("attachment")
                .into_static(),
            AttachError::PayloadTooLarge {
                size_bytes,
                max_bytes,
            } => ErrorKind::PayloadTooLarge
                .with_context(format!(
                    "Upload of {size_bytes} bytes exceeds the limit of {max_bytes} bytes"
                ))
                .with_resource("attachment")
                .into_static(),
            AttachError::InvalidPolicy(reason) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    reason = %reason,
                    "upload policy is unusable"
                );
                ErrorKind::InternalServerError.into_error()
            }
            AttachError::StorageWriteFailed { key, source } => {
                tracing::error!(
                    target: TRACING_TARGET,
                    storage_key = %key,
                    error = %source,
                    "object store write failed"
                );
                ErrorKind::StorageWriteFailed.into_error()
            }
            AttachError::IntegrityMismatch { key, detail } => {
                tracing::error!(
                    target: TRACING_TARGET,
                    storage_key = %key,
                    detail = %detail,
                    "stored object failed verification"
                );
                ErrorKind::UploadIntegrityMismatch.into_error()
            }
            AttachError::NotFound { attachment_id } => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    attachment_id = %attachment_id,
                    "attachment not found"
                );
                ErrorKind::NotFound.with_resource("attachment").into_static()
            }
            AttachError::Storage(storage_error) => {
                if storage_error.is_not_found() {
                    return ErrorKind::NotFound.with_resource("attachment").into_static();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %storage_error,
                    "object store operation failed"
                );
                ErrorKind::InternalServerError.into_error()
            }
            AttachError::Metadata(pg_error) => pg_error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn unsupported_media_type_maps_to_415() {
        let error = Error::from(AttachError::UnsupportedMediaType {
            mime_type: "application/x-msdownload".to_owned(),
        });

        assert_eq!(
            error.kind().status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(error.resource(), Some("attachment"));
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        let error = Error::from(AttachError::PayloadTooLarge {
            size_bytes: 20_000_000,
            max_bytes: 10_485_760,
        });

        assert_eq!(error.kind().status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn missing_attachment_maps_to_404() {
        let error = Error::from(AttachError::NotFound {
            attachment_id: Uuid::nil(),
        });

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.resource(), Some("attachment"));
    }

    #[test]
    fn verification_failure_is_not_exposed_as_client_error() {
        let error = Error::from(AttachError::IntegrityMismatch {
            key: "encounters/1/test".to_owned(),
            detail: "size mismatch".to_owned(),
        });

        assert_eq!(error.kind(), ErrorKind::UploadIntegrityMismatch);
        assert_eq!(
            error.kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
