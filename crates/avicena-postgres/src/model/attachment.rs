//! Attachment model for uploaded clinical files.

use diesel::prelude::*;
use jiff::SignedDuration;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::attachments;
use crate::types::{
    AttachmentSource, HasCreatedAt, HasDeletedAt, HasUpdatedAt, OwnerKind,
    RECENTLY_UPLOADED_HOURS,
};

/// Metadata record for one object in external storage.
///
/// A row is written only after the object itself has been stored and
/// verified, so every live row points at a readable object.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Attachment {
    /// Unique identifier of the attachment.
    pub id: Uuid,
    /// Kind of clinical record the attachment belongs to.
    pub owner_kind: OwnerKind,
    /// Identifier of the owning record.
    pub owner_id: Uuid,
    /// Location of the object in external storage.
    pub storage_key: String,
    /// Sanitized filename presented on download.
    pub filename: String,
    /// Declared MIME type of the content.
    pub mime_type: String,
    /// Size of the stored object in bytes.
    pub size_bytes: i64,
    /// Optional clinical category label.
    pub category: Option<String>,
    /// Optional free-form details.
    pub details: Option<String>,
    /// Hospital workflow the attachment originated from.
    pub source: Option<AttachmentSource>,
    /// Identifier of the originating order or document.
    pub source_id: Option<Uuid>,
    /// Identifier of the uploading actor.
    pub created_by: Option<Uuid>,
    /// Timestamp when the attachment was created.
    pub created_at: Timestamp,
    /// Timestamp when the attachment was last modified.
    pub updated_at: Timestamp,
    /// Timestamp when the attachment was soft-deleted, if ever.
    pub deleted_at: Option<Timestamp>,
}

/// Insertable record for a newly stored attachment.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = attachments)]
pub struct NewAttachment {
    /// Kind of clinical record the attachment belongs to.
    pub owner_kind: OwnerKind,
    /// Identifier of the owning record.
    pub owner_id: Uuid,
    /// Location of the object in external storage.
    pub storage_key: String,
    /// Sanitized filename presented on download.
    pub filename: String,
    /// Declared MIME type of the content.
    pub mime_type: String,
    /// Size of the stored object in bytes.
    pub size_bytes: i64,
    /// Optional clinical category label.
    pub category: Option<String>,
    /// Optional free-form details.
    pub details: Option<String>,
    /// Hospital workflow the attachment originated from.
    pub source: Option<AttachmentSource>,
    /// Identifier of the originating order or document.
    pub source_id: Option<Uuid>,
    /// Identifier of the uploading actor.
    pub created_by: Option<Uuid>,
}

/// Change set for annotating an existing attachment.
///
/// Fields left as `None` are not touched. Annotation only ever sets values,
/// so there is no way to clear a label once applied.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = attachments)]
pub struct UpdateAttachment {
    /// New clinical category label.
    pub category: Option<String>,
    /// New free-form details.
    pub details: Option<String>,
}

impl Attachment {
    /// Returns `true` if the attachment has been soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns `true` if the attachment is visible to listings and downloads.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Returns `true` if the attachment was uploaded within the last hour.
    #[must_use]
    pub fn is_recently_uploaded(&self) -> bool {
        self.was_created_within(SignedDuration::from_hours(RECENTLY_UPLOADED_HOURS))
    }

    /// Returns the object size formatted for humans.
    pub fn size_human(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

        let mut size = self.size_bytes as f64;
        let mut unit_index = 0;
        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size_bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }
}

impl UpdateAttachment {
    /// Returns `true` if the change set would not modify any column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.details.is_none()
    }
}

impl HasCreatedAt for Attachment {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Attachment {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

impl HasDeletedAt for Attachment {
    fn deleted_at(&self) -> Option<jiff::Timestamp> {
        self.deleted_at.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment_with_size(size_bytes: i64) -> Attachment {
        let now = jiff::Timestamp::now();
        Attachment {
            id: Uuid::new_v4(),
            owner_kind: OwnerKind::Encounter,
            owner_id: Uuid::new_v4(),
            storage_key: "encounters/test/2025/06/deadbeef_scan.pdf".to_owned(),
            filename: "scan.pdf".to_owned(),
            mime_type: "application/pdf".to_owned(),
            size_bytes,
            category: None,
            details: None,
            source: None,
            source_id: None,
            created_by: None,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_size_human_formatting() {
        assert_eq!(attachment_with_size(512).size_human(), "512 B");
        assert_eq!(attachment_with_size(2048).size_human(), "2.0 KB");
        assert_eq!(attachment_with_size(5 * 1024 * 1024).size_human(), "5.0 MB");
        assert_eq!(
            attachment_with_size(3 * 1024 * 1024 * 1024).size_human(),
            "3.0 GB"
        );
    }

    #[test]
    fn test_liveness_tracks_deleted_at() {
        let mut attachment = attachment_with_size(100);
        assert!(attachment.is_live());
        assert!(!attachment.is_deleted());
        assert!(attachment.is_recently_uploaded());

        attachment.deleted_at = Some(jiff::Timestamp::now().into());
        assert!(attachment.is_deleted());
        assert!(!attachment.is_live());
    }

    #[test]
    fn test_update_change_set_emptiness() {
        assert!(UpdateAttachment::default().is_empty());

        let changes = UpdateAttachment {
            category: Some("radiology".to_owned()),
            details: None,
        };
        assert!(!changes.is_empty());
    }
}
