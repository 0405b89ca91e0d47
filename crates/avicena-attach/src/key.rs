//! Filename sanitization and collision-free storage key minting.

use std::fmt;
use std::marker::PhantomData;

use rand::Rng;
use uuid::Uuid;

use crate::owner::AttachmentOwner;

/// Fallback filename when sanitization leaves nothing recognizable.
const FALLBACK_FILENAME: &str = "unnamed";
/// Number of random bytes in the per-key uniqueness token.
const TOKEN_BYTES: usize = 16;

/// Replaces storage-hostile characters in a client-supplied filename.
///
/// Characters outside ASCII alphanumerics, dot, dash, underscore and space
/// become underscores. A name without a single alphanumeric character left
/// collapses to `unnamed`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().any(|ch| ch.is_ascii_alphanumeric()) {
        sanitized
    } else {
        FALLBACK_FILENAME.to_owned()
    }
}

/// Storage key for one attachment object, scoped to an owner kind.
///
/// Keys follow `{prefix}/{owner_id}/{year}/{month}/{token}_{filename}`. The
/// token is 16 random bytes hex-encoded, which keeps keys unique even when
/// the same filename is uploaded to the same owner repeatedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey<O> {
    key: String,
    _owner: PhantomData<O>,
}

impl<O: AttachmentOwner> StorageKey<O> {
    /// Mints a fresh key for an owner and an already sanitized filename.
    pub fn mint(owner_id: Uuid, sanitized_filename: &str) -> Self {
        let mut token_bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut token_bytes);
        let token = hex::encode(token_bytes);

        let now = jiff::Timestamp::now().to_zoned(jiff::tz::TimeZone::UTC);
        let key = format!(
            "{prefix}/{owner_id}/{year}/{month:02}/{token}_{filename}",
            prefix = O::key_prefix(),
            year = now.year(),
            month = now.month(),
            filename = sanitized_filename,
        );

        Self {
            key,
            _owner: PhantomData,
        }
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Consumes the key, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.key
    }
}

impl<O> fmt::Display for StorageKey<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::{Encounter, Patient};

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("report-v2_final.pdf"), "report-v2_final.pdf");
        assert_eq!(sanitize_filename("x y@#.png"), "x y__.png");
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_filename("café.png"), "caf_.png");
        assert_eq!(sanitize_filename("результат.pdf"), "_________.pdf");
    }

    #[test]
    fn test_sanitize_falls_back_when_nothing_recognizable() {
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename("@@@"), "unnamed");
        assert_eq!(sanitize_filename("..."), "unnamed");
        assert_eq!(sanitize_filename("   "), "unnamed");
    }

    #[test]
    fn test_mint_produces_expected_layout() {
        let owner_id = Uuid::new_v4();
        let key = StorageKey::<Encounter>::mint(owner_id, "scan.pdf");

        let parts: Vec<&str> = key.as_str().split('/').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "encounters");
        assert_eq!(parts[1], owner_id.to_string());
        assert_eq!(parts[2].len(), 4);
        assert_eq!(parts[3].len(), 2);

        let (token, filename) = parts[4].split_once('_').unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_eq!(filename, "scan.pdf");
    }

    #[test]
    fn test_mint_is_unique_per_call() {
        let owner_id = Uuid::new_v4();
        let first = StorageKey::<Encounter>::mint(owner_id, "scan.pdf");
        let second = StorageKey::<Encounter>::mint(owner_id, "scan.pdf");
        assert_ne!(first, second);
    }

    #[test]
    fn test_mint_uses_owner_prefix() {
        let key = StorageKey::<Patient>::mint(Uuid::new_v4(), "card.png");
        assert!(key.as_str().starts_with("patients/"));
    }
}
