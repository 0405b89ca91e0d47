//! Result and status types describing migration runs.

use std::time::Duration;

/// Snapshot of applied and pending schema migrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Versions recorded as applied in the database, in order.
    pub applied_versions: Vec<String>,
    /// Embedded versions not yet applied, in order.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Creates a status from applied and pending version lists.
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Returns `true` if no migrations are waiting to be applied.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }

    /// Returns the number of applied migrations.
    #[must_use]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    /// Returns the number of pending migrations.
    #[must_use]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    /// Returns the total number of known migrations.
    #[must_use]
    pub fn total_migrations(&self) -> usize {
        self.applied_migrations() + self.pending_migrations()
    }

    /// Returns the fraction of known migrations already applied.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        let total = self.total_migrations();
        if total == 0 {
            return 1.0;
        }
        self.applied_migrations() as f64 / total as f64
    }

    /// Returns the most recently applied version.
    #[must_use]
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }

    /// Returns the next version that would be applied.
    #[must_use]
    pub fn next_pending_version(&self) -> Option<&str> {
        self.pending_versions.first().map(String::as_str)
    }
}

/// Outcome of one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall-clock duration of the run.
    pub duration: Duration,
    /// Versions applied during the run, in order.
    pub processed_versions: Vec<String>,
    /// Failure message if the run was aborted partway.
    pub error_message: Option<String>,
}

impl MigrationResult {
    /// Creates a result for a completed run.
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
            error_message: None,
        }
    }

    /// Creates a result for an aborted run.
    pub fn failure(
        duration: Duration,
        processed_versions: Vec<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            duration,
            processed_versions,
            error_message: Some(error_message.into()),
        }
    }

    /// Returns `true` if the run completed without errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    /// Returns `true` if the run completed without applying anything.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.is_success() && self.processed_versions.is_empty()
    }

    /// Returns the number of migrations applied during the run.
    #[must_use]
    pub fn migrations_applied(&self) -> usize {
        self.processed_versions.len()
    }

    /// Returns the last version applied during the run.
    #[must_use]
    pub fn last_processed_version(&self) -> Option<&str> {
        self.processed_versions.last().map(String::as_str)
    }

    /// Returns the mean duration per applied migration.
    #[must_use]
    pub fn average_time_per_migration(&self) -> Option<Duration> {
        let applied = self.migrations_applied();
        (applied > 0).then(|| self.duration / applied as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn test_migration_status_calculations() {
        let status = MigrationStatus::new(versions(&["001", "002"]), versions(&["003"]));
        assert!(!status.is_up_to_date());
        assert_eq!(status.total_migrations(), 3);
        assert_eq!(status.last_applied_version(), Some("002"));
        assert_eq!(status.next_pending_version(), Some("003"));
        assert!((status.progress_ratio() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_status_is_up_to_date() {
        let status = MigrationStatus::new(Vec::new(), Vec::new());
        assert!(status.is_up_to_date());
        assert!((status.progress_ratio() - 1.0).abs() < f64::EPSILON);
        assert_eq!(status.last_applied_version(), None);
    }

    #[test]
    fn test_migration_result_no_op() {
        let result = MigrationResult::success(Duration::from_millis(5), Vec::new());
        assert!(result.is_success());
        assert!(result.is_no_op());
        assert_eq!(result.average_time_per_migration(), None);
    }

    #[test]
    fn test_migration_result_averages() {
        let result = MigrationResult::success(Duration::from_secs(4), versions(&["001", "002"]));
        assert!(!result.is_no_op());
        assert_eq!(result.migrations_applied(), 2);
        assert_eq!(result.last_processed_version(), Some("002"));
        assert_eq!(result.average_time_per_migration(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_migration_result_failure() {
        let result = MigrationResult::failure(
            Duration::from_secs(1),
            versions(&["001"]),
            "relation already exists",
        );
        assert!(!result.is_success());
        assert!(!result.is_no_op());
        assert_eq!(result.migrations_applied(), 1);
    }
}
