//! Owning record kinds for stored attachments.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of clinical record an attachment belongs to.
///
/// Corresponds to the `OWNER_KIND` enum in PostgreSQL. Every attachment is
/// scoped to exactly one owning record, and listings are always performed
/// within a single owner.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::OwnerKind"]
pub enum OwnerKind {
    /// A patient encounter (admission, visit, or episode of care).
    #[db_rename = "encounter"]
    #[serde(rename = "encounter")]
    #[default]
    Encounter,
    /// A patient master record.
    #[db_rename = "patient"]
    #[serde(rename = "patient")]
    Patient,
    /// An inter-facility patient transfer.
    #[db_rename = "transfer"]
    #[serde(rename = "transfer")]
    Transfer,
}

impl OwnerKind {
    /// Returns the storage key prefix for attachments of this owner kind.
    #[inline]
    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::Encounter => "encounters",
            Self::Patient => "patients",
            Self::Transfer => "transfers",
        }
    }

    /// Returns a human-readable description of the owner kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Encounter => "Patient encounter",
            Self::Patient => "Patient record",
            Self::Transfer => "Patient transfer",
        }
    }

    /// Returns `true` if attachments are scoped to a patient encounter.
    #[inline]
    pub fn is_encounter(self) -> bool {
        matches!(self, Self::Encounter)
    }

    /// Returns `true` if attachments are scoped to a patient record.
    #[inline]
    pub fn is_patient(self) -> bool {
        matches!(self, Self::Patient)
    }

    /// Returns `true` if attachments are scoped to a patient transfer.
    #[inline]
    pub fn is_transfer(self) -> bool {
        matches!(self, Self::Transfer)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_key_prefixes_are_unique() {
        let prefixes: Vec<_> = OwnerKind::iter().map(OwnerKind::key_prefix).collect();
        let mut deduped = prefixes.clone();
        deduped.dedup();
        assert_eq!(prefixes.len(), deduped.len());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let serialized = serde_json::to_string(&OwnerKind::Encounter).unwrap();
        assert_eq!(serialized, "\"encounter\"");

        let deserialized: OwnerKind = serde_json::from_str("\"transfer\"").unwrap();
        assert_eq!(deserialized, OwnerKind::Transfer);
    }
}
