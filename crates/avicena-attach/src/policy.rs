//! Upload acceptance policy.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{AttachError, AttachResult};

/// MIME types accepted when no explicit policy is configured.
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 3] =
    ["application/pdf", "image/png", "image/jpeg"];
/// Default maximum upload size in bytes (10 MiB).
pub const DEFAULT_MAX_BYTES: i64 = 10 * 1024 * 1024;
/// Default lifetime of presigned download URLs in seconds.
pub const DEFAULT_PRESIGN_EXPIRY_SECS: i64 = 300;
/// Longest accepted presign lifetime; S3 caps presigned URLs at seven days.
pub const MAX_PRESIGN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Gates applied to every upload before any byte reaches storage.
///
/// The policy is deliberately owner-agnostic: the same rules apply whether
/// an attachment is filed under an encounter, a patient or a transfer.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AttachmentPolicy {
    /// MIME types accepted for upload, compared case-insensitively.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "attachment-allowed-mime-types",
            env = "ATTACHMENT_ALLOWED_MIME_TYPES",
            value_delimiter = ',',
            default_values_t = DEFAULT_ALLOWED_MIME_TYPES.map(str::to_owned)
        )
    )]
    pub allowed_mime_types: Vec<String>,

    /// Maximum accepted upload size in bytes.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "attachment-max-bytes",
            env = "ATTACHMENT_MAX_BYTES",
            default_value_t = DEFAULT_MAX_BYTES
        )
    )]
    pub max_bytes: i64,

    /// Lifetime of presigned download URLs in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "attachment-presign-expiry-secs",
            env = "ATTACHMENT_PRESIGN_EXPIRY_SECS",
            default_value_t = DEFAULT_PRESIGN_EXPIRY_SECS
        )
    )]
    pub presign_expiry_secs: i64,
}

impl AttachmentPolicy {
    /// Returns `true` if the given MIME type is accepted for upload.
    #[must_use]
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }

    /// Returns the presigned URL lifetime as a [`Duration`].
    #[must_use]
    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs.max(0) as u64)
    }

    /// Validates the policy values.
    pub fn validate(&self) -> AttachResult<()> {
        if self.allowed_mime_types.is_empty() {
            return Err(AttachError::InvalidPolicy(
                "At least one MIME type must be allowed".to_owned(),
            ));
        }

        if self
            .allowed_mime_types
            .iter()
            .any(|mime_type| mime_type.trim().is_empty())
        {
            return Err(AttachError::InvalidPolicy(
                "Allowed MIME types must not be blank".to_owned(),
            ));
        }

        if self.max_bytes <= 0 {
            return Err(AttachError::InvalidPolicy(
                "Maximum upload size must be positive".to_owned(),
            ));
        }

        if self.presign_expiry_secs <= 0 {
            return Err(AttachError::InvalidPolicy(
                "Presign expiry must be positive".to_owned(),
            ));
        }

        if self.presign_expiry_secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AttachError::InvalidPolicy(
                "Presign expiry must not exceed seven days".to_owned(),
            ));
        }

        Ok(())
    }
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES.map(str::to_owned).into(),
            max_bytes: DEFAULT_MAX_BYTES,
            presign_expiry_secs: DEFAULT_PRESIGN_EXPIRY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = AttachmentPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.presign_expiry(), Duration::from_secs(300));
    }

    #[test]
    fn test_mime_check_ignores_case() {
        let policy = AttachmentPolicy::default();
        assert!(policy.allows_mime_type("application/pdf"));
        assert!(policy.allows_mime_type("Application/PDF"));
        assert!(!policy.allows_mime_type("image/gif"));
        assert!(!policy.allows_mime_type(""));
    }

    #[test]
    fn test_rejects_empty_mime_list() {
        let policy = AttachmentPolicy {
            allowed_mime_types: Vec::new(),
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_mime_entries() {
        let policy = AttachmentPolicy {
            allowed_mime_types: vec!["application/pdf".to_owned(), "  ".to_owned()],
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_limits() {
        let policy = AttachmentPolicy {
            max_bytes: 0,
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = AttachmentPolicy {
            presign_expiry_secs: -5,
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rejects_expiry_beyond_seven_days() {
        let policy = AttachmentPolicy {
            presign_expiry_secs: MAX_PRESIGN_EXPIRY_SECS + 1,
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = AttachmentPolicy {
            presign_expiry_secs: MAX_PRESIGN_EXPIRY_SECS,
            ..AttachmentPolicy::default()
        };
        assert!(policy.validate().is_ok());
    }
}
