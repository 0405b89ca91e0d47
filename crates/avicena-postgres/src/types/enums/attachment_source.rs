//! Originating hospital workflows for uploaded attachments.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Hospital workflow an attachment originated from.
///
/// Corresponds to the `ATTACHMENT_SOURCE` enum in PostgreSQL. The source is
/// optional on upload and can be paired with a `source_id` pointing at the
/// originating order or document.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AttachmentSource"]
pub enum AttachmentSource {
    /// Laboratory order results and reports.
    #[db_rename = "lab_order"]
    #[serde(rename = "lab_order")]
    #[strum(serialize = "lab_order")]
    LabOrder,
    /// Radiology order images and findings.
    #[db_rename = "radiology_order"]
    #[serde(rename = "radiology_order")]
    #[strum(serialize = "radiology_order")]
    RadiologyOrder,
    /// Prescription and medication documents.
    #[db_rename = "prescription"]
    #[serde(rename = "prescription")]
    #[strum(serialize = "prescription")]
    Prescription,
    /// Free-form clinical notes.
    #[db_rename = "clinical_note"]
    #[serde(rename = "clinical_note")]
    #[strum(serialize = "clinical_note")]
    ClinicalNote,
    /// Referral letters to or from other providers.
    #[db_rename = "referral"]
    #[serde(rename = "referral")]
    #[strum(serialize = "referral")]
    Referral,
    /// Signed consent forms.
    #[db_rename = "consent"]
    #[serde(rename = "consent")]
    #[strum(serialize = "consent")]
    Consent,
    /// Patient registration paperwork.
    #[db_rename = "registration"]
    #[serde(rename = "registration")]
    #[strum(serialize = "registration")]
    Registration,
    /// Insurance cards and coverage documents.
    #[db_rename = "insurance"]
    #[serde(rename = "insurance")]
    #[strum(serialize = "insurance")]
    Insurance,
}

impl AttachmentSource {
    /// Returns `true` if the source is part of a clinical workflow.
    #[inline]
    pub fn is_clinical(self) -> bool {
        matches!(
            self,
            Self::LabOrder
                | Self::RadiologyOrder
                | Self::Prescription
                | Self::ClinicalNote
                | Self::Referral
        )
    }

    /// Returns `true` if the source is part of an administrative workflow.
    #[inline]
    pub fn is_administrative(self) -> bool {
        !self.is_clinical()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parses_from_snake_case() {
        let source = AttachmentSource::from_str("radiology_order").unwrap();
        assert_eq!(source, AttachmentSource::RadiologyOrder);
        assert!(AttachmentSource::from_str("RadiologyOrder").is_err());
    }

    #[test]
    fn test_serde_matches_strum_spelling() {
        for source in AttachmentSource::iter() {
            let serialized = serde_json::to_string(&source).unwrap();
            let expected = format!("\"{source}\"");
            assert_eq!(serialized, expected);
        }
    }

    #[test]
    fn test_every_source_is_clinical_or_administrative() {
        for source in AttachmentSource::iter() {
            assert_ne!(source.is_clinical(), source.is_administrative());
        }
    }
}
