//! Typed representation of database constraint violations.
//!
//! PostgreSQL reports violated constraints by name. Parsing the name into a
//! typed value lets callers distinguish, for example, a storage key collision
//! from a column validation failure without string matching at the call site.

use std::fmt;

use serde::{Deserialize, Serialize};

mod attachments;

pub use self::attachments::AttachmentConstraints;

/// Broad category of a database constraint.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConstraintCategory {
    /// Shape or content checks on individual columns.
    Validation,
    /// Ordering requirements between timestamp columns.
    Chronological,
    /// Rules enforcing domain behavior.
    BusinessLogic,
    /// Uniqueness requirements across rows.
    Uniqueness,
}

/// A recognized constraint violation reported by PostgreSQL.
#[derive(Debug, Clone, Eq, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    /// Violation of a constraint on the `attachments` table.
    Attachment(AttachmentConstraints),
}

impl ConstraintViolation {
    /// Parses a constraint name as reported in a database error.
    ///
    /// Constraint names are prefixed with their table name, which selects the
    /// per-table enum to parse against.
    pub fn new(constraint: &str) -> Option<Self> {
        match constraint.split('_').next()? {
            "attachments" => AttachmentConstraints::new(constraint).map(Self::Attachment),
            _ => None,
        }
    }

    /// Returns the name of the table the constraint is defined on.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Attachment(_) => "attachments",
        }
    }

    /// Returns the category of the violated constraint.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            Self::Attachment(constraint) => constraint.categorize(),
        }
    }

    /// Returns `true` if the violation is a uniqueness conflict.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.constraint_category() == ConstraintCategory::Uniqueness
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment(constraint) => constraint.fmt(f),
        }
    }
}

impl From<ConstraintViolation> for String {
    fn from(value: ConstraintViolation) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or(strum::ParseError::VariantNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_prefixed_constraint_names() {
        let violation = ConstraintViolation::new("attachments_storage_key_unique");
        assert_eq!(
            violation,
            Some(ConstraintViolation::Attachment(
                AttachmentConstraints::StorageKeyUnique
            ))
        );
        assert_eq!(violation.as_ref().map(ConstraintViolation::table_name), Some("attachments"));
    }

    #[test]
    fn test_rejects_unknown_tables() {
        assert!(ConstraintViolation::new("documents_name_check").is_none());
        assert!(ConstraintViolation::new("").is_none());
    }

    #[test]
    fn test_categorizes_uniqueness() {
        let violation = ConstraintViolation::Attachment(AttachmentConstraints::StorageKeyUnique);
        assert!(violation.is_unique_violation());

        let violation = ConstraintViolation::Attachment(AttachmentConstraints::SizeBytesMin);
        assert!(!violation.is_unique_violation());
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Validation
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let violation = ConstraintViolation::Attachment(AttachmentConstraints::FilenameNotEmpty);
        let serialized = serde_json::to_string(&violation).unwrap();
        assert_eq!(serialized, "\"attachments_filename_not_empty\"");

        let deserialized: ConstraintViolation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, violation);
    }
}
