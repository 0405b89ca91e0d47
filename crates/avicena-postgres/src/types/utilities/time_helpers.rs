//! Shared traits for models with lifecycle timestamp columns.

use jiff::{SignedDuration, Timestamp};

/// Common durations used by the timestamp helper traits.
pub mod constants {
    use jiff::SignedDuration;

    /// Duration after creation during which a record counts as recent.
    pub const RECENTLY_CREATED: SignedDuration = SignedDuration::from_hours(24);
    /// Duration after an update during which a record counts as recently updated.
    pub const RECENTLY_UPDATED: SignedDuration = SignedDuration::from_hours(1);
}

/// Returns `true` if the timestamp lies within `duration` of the current time.
pub fn is_within_duration(timestamp: Timestamp, duration: SignedDuration) -> bool {
    Timestamp::now().duration_since(timestamp) <= duration
}

/// Trait for models that track their creation time.
pub trait HasCreatedAt {
    /// Returns the creation timestamp of the record.
    fn created_at(&self) -> Timestamp;

    /// Returns `true` if the record was created within the last day.
    fn is_recently_created(&self) -> bool {
        is_within_duration(self.created_at(), constants::RECENTLY_CREATED)
    }

    /// Returns `true` if the record was created within the given duration.
    fn was_created_within(&self, duration: SignedDuration) -> bool {
        is_within_duration(self.created_at(), duration)
    }

    /// Returns the elapsed time since the record was created.
    fn creation_age(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.created_at())
    }
}

/// Trait for models that track their last modification time.
pub trait HasUpdatedAt {
    /// Returns the last modification timestamp of the record.
    fn updated_at(&self) -> Timestamp;

    /// Returns `true` if the record was modified within the last hour.
    fn is_recently_updated(&self) -> bool {
        is_within_duration(self.updated_at(), constants::RECENTLY_UPDATED)
    }

    /// Returns the elapsed time since the record was last modified.
    fn time_since_update(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.updated_at())
    }
}

/// Trait for models that support soft deletion.
pub trait HasDeletedAt {
    /// Returns the deletion timestamp, if the record has been deleted.
    fn deleted_at(&self) -> Option<Timestamp>;

    /// Returns `true` if the record has been soft-deleted.
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Returns `true` if the record has not been soft-deleted.
    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }

    /// Returns the elapsed time since deletion, if the record was deleted.
    fn time_since_deletion(&self) -> Option<SignedDuration> {
        self.deleted_at()
            .map(|deleted_at| Timestamp::now().duration_since(deleted_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        created_at: Timestamp,
        deleted_at: Option<Timestamp>,
    }

    impl HasCreatedAt for Record {
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    impl HasDeletedAt for Record {
        fn deleted_at(&self) -> Option<Timestamp> {
            self.deleted_at
        }
    }

    #[test]
    fn test_recently_created_detection() {
        let fresh = Record {
            created_at: Timestamp::now(),
            deleted_at: None,
        };
        assert!(fresh.is_recently_created());

        let stale = Record {
            created_at: Timestamp::now() - SignedDuration::from_hours(48),
            deleted_at: None,
        };
        assert!(!stale.is_recently_created());
        assert!(stale.was_created_within(SignedDuration::from_hours(72)));
    }

    #[test]
    fn test_deletion_state() {
        let live = Record {
            created_at: Timestamp::now(),
            deleted_at: None,
        };
        assert!(live.is_active());
        assert!(!live.is_deleted());
        assert!(live.time_since_deletion().is_none());

        let deleted = Record {
            created_at: Timestamp::now(),
            deleted_at: Some(Timestamp::now()),
        };
        assert!(deleted.is_deleted());
        assert!(!deleted.is_active());
        assert!(deleted.time_since_deletion().is_some());
    }
}
