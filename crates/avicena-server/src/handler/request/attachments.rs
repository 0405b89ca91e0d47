//! Attachment request types.

use avicena_postgres::model::UpdateAttachment;
use avicena_postgres::query::AttachmentFilter;
use avicena_postgres::types::AttachmentSource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for listing attachments of an owning record.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAttachmentsQuery {
    /// Keep only attachments from this workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AttachmentSource>,

    /// Keep only attachments referencing this originating record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
}

impl ListAttachmentsQuery {
    /// Converts the query parameters into a repository filter.
    #[must_use]
    pub fn into_filter(self) -> AttachmentFilter {
        AttachmentFilter {
            source: self.source,
            source_id: self.source_id,
        }
    }
}

/// Request to update the annotation fields of an attachment.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttachmentRequest {
    /// New clinical category label.
    #[validate(length(min = 1, max = 120))]
    pub category: Option<String>,

    /// New free-form details.
    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

impl UpdateAttachmentRequest {
    /// Returns `true` if the request carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.details.is_none()
    }

    /// Converts the request into a database changeset.
    #[must_use]
    pub fn into_changes(self) -> UpdateAttachment {
        UpdateAttachment {
            category: self.category,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod test {
    use validator::Validate;

    use super::*;

    #[test]
    fn empty_update_carries_no_changes() {
        let request = UpdateAttachmentRequest {
            category: None,
            details: None,
        };
        assert!(request.is_empty());
    }

    #[test]
    fn blank_category_fails_validation() {
        let request = UpdateAttachmentRequest {
            category: Some(String::new()),
            details: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_details_fail_validation() {
        let request = UpdateAttachmentRequest {
            category: None,
            details: Some("x".repeat(2001)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn query_converts_into_filter() {
        let query = ListAttachmentsQuery {
            source: Some(AttachmentSource::LabOrder),
            source_id: None,
        };

        let filter = query.into_filter();
        assert_eq!(filter.source, Some(AttachmentSource::LabOrder));
        assert!(filter.source_id.is_none());
    }
}
