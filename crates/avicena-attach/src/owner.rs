//! Owner kinds as zero-sized type markers.

use std::fmt::Debug;

use avicena_postgres::types::OwnerKind;

/// Marker trait tying an attachment operation to the kind of owning record.
///
/// Implementations are zero-sized markers used as type parameters, so an
/// attachment minted for an encounter cannot be filed under a patient by
/// mixing up arguments.
pub trait AttachmentOwner: Debug + Clone + Copy + Send + Sync + 'static {
    /// Returns the owner kind this marker represents.
    fn kind() -> OwnerKind;

    /// Returns the storage key prefix for this owner kind.
    #[must_use]
    fn key_prefix() -> &'static str {
        Self::kind().key_prefix()
    }
}

/// Attachments owned by a patient encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encounter;

/// Attachments owned by a patient master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient;

/// Attachments owned by an inter-facility transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer;

impl AttachmentOwner for Encounter {
    fn kind() -> OwnerKind {
        OwnerKind::Encounter
    }
}

impl AttachmentOwner for Patient {
    fn kind() -> OwnerKind {
        OwnerKind::Patient
    }
}

impl AttachmentOwner for Transfer {
    fn kind() -> OwnerKind {
        OwnerKind::Transfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_map_to_their_kind() {
        assert_eq!(Encounter::kind(), OwnerKind::Encounter);
        assert_eq!(Patient::kind(), OwnerKind::Patient);
        assert_eq!(Transfer::kind(), OwnerKind::Transfer);
    }

    #[test]
    fn test_key_prefixes_follow_the_kind() {
        assert_eq!(Encounter::key_prefix(), "encounters");
        assert_eq!(Patient::key_prefix(), "patients");
        assert_eq!(Transfer::key_prefix(), "transfers");
    }
}
