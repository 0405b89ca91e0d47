//! Constraint violations for the `attachments` table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Named constraints defined on the `attachments` table.
///
/// The variants mirror the constraint names in the schema migrations, so a
/// constraint name reported by PostgreSQL parses directly into a variant.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AttachmentConstraints {
    // Uniqueness constraints
    /// Two attachments may not share a storage key.
    #[strum(serialize = "attachments_storage_key_unique")]
    StorageKeyUnique,

    // Validation constraints
    /// Filenames must not be empty or whitespace.
    #[strum(serialize = "attachments_filename_not_empty")]
    FilenameNotEmpty,
    /// MIME types must not be empty or whitespace.
    #[strum(serialize = "attachments_mime_type_not_empty")]
    MimeTypeNotEmpty,
    /// Attachments must contain at least one byte.
    #[strum(serialize = "attachments_size_bytes_min")]
    SizeBytesMin,

    // Chronological constraints
    /// Modification time may not precede creation time.
    #[strum(serialize = "attachments_updated_after_created")]
    UpdatedAfterCreated,
    /// Deletion time may not precede creation time.
    #[strum(serialize = "attachments_deleted_after_created")]
    DeletedAfterCreated,
}

impl AttachmentConstraints {
    /// Parses a constraint name reported by the database.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of the constraint.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::StorageKeyUnique => ConstraintCategory::Uniqueness,
            Self::FilenameNotEmpty | Self::MimeTypeNotEmpty | Self::SizeBytesMin => {
                ConstraintCategory::Validation
            }
            Self::UpdatedAfterCreated | Self::DeletedAfterCreated => {
                ConstraintCategory::Chronological
            }
        }
    }
}

impl From<AttachmentConstraints> for String {
    fn from(value: AttachmentConstraints) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AttachmentConstraints {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parses_schema_constraint_names() {
        let constraint = AttachmentConstraints::new("attachments_storage_key_unique");
        assert_eq!(constraint, Some(AttachmentConstraints::StorageKeyUnique));
        assert!(AttachmentConstraints::new("attachments_unknown_check").is_none());
    }

    #[test]
    fn test_round_trips_through_display() {
        for constraint in AttachmentConstraints::iter() {
            let name = constraint.to_string();
            assert_eq!(AttachmentConstraints::new(&name), Some(constraint));
        }
    }
}
