//! Migration extension methods on the database client.

use std::future::Future;

use super::{
    MigrationResult, MigrationStatus, get_migration_status, run_pending_migrations,
    verify_schema_integrity,
};
use crate::{PgClient, PgResult};

/// Extension trait exposing migration operations on [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies all pending embedded migrations.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>>;

    /// Reports applied and pending migration versions.
    fn get_migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>>;

    /// Verifies that the required tables exist in the schema.
    fn verify_schema_integrity(&self) -> impl Future<Output = PgResult<bool>>;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }

    async fn get_migration_status(&self) -> PgResult<MigrationStatus> {
        let mut conn = self.get_connection().await?;
        get_migration_status(&mut conn).await
    }

    async fn verify_schema_integrity(&self) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;
        verify_schema_integrity(&mut conn).await
    }
}
