//! Attachment-related constraint violation error handlers.

use avicena_postgres::types::AttachmentConstraints;

use crate::handler::{Error, ErrorKind};

impl From<AttachmentConstraints> for Error<'static> {
    fn from(c: AttachmentConstraints) -> Self {
        let error = match c {
            AttachmentConstraints::StorageKeyUnique => {
                ErrorKind::Conflict.with_message("An attachment with this storage key already exists")
            }
            AttachmentConstraints::FilenameNotEmpty => {
                ErrorKind::BadRequest.with_message("Attachment filename must not be empty")
            }
            AttachmentConstraints::MimeTypeNotEmpty => {
                ErrorKind::BadRequest.with_message("Attachment MIME type must not be empty")
            }
            AttachmentConstraints::SizeBytesMin => {
                ErrorKind::BadRequest.with_message("Attachment must contain at least one byte")
            }
            AttachmentConstraints::UpdatedAfterCreated
            | AttachmentConstraints::DeletedAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("attachment")
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn storage_key_collision_maps_to_conflict() {
        let error = Error::from(AttachmentConstraints::StorageKeyUnique);
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("attachment"));
    }

    #[test]
    fn validation_constraints_map_to_bad_request() {
        let constraints = [
            AttachmentConstraints::FilenameNotEmpty,
            AttachmentConstraints::MimeTypeNotEmpty,
            AttachmentConstraints::SizeBytesMin,
        ];

        for constraint in constraints {
            let error = Error::from(constraint);
            assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn chronological_constraints_map_to_internal_error() {
        let constraints = [
            AttachmentConstraints::UpdatedAfterCreated,
            AttachmentConstraints::DeletedAfterCreated,
        ];

        for constraint in constraints {
            let error = Error::from(constraint);
            assert_eq!(error.kind(), ErrorKind::InternalServerError);
        }
    }
}
