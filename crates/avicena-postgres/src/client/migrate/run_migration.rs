//! Applies pending embedded migrations.

use std::ops::DerefMut;
use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tracing::info;

use super::{MigrationResult, custom_hooks, get_migration_status};
use crate::{MIGRATIONS, PgClient, PgConnection, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applies all pending migrations and returns a run summary.
///
/// Migration execution happens on a blocking thread because the embedded
/// harness drives a synchronous connection wrapper.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let started_at = Instant::now();

    let mut conn = pg.get_pooled_connection().await?;

    let status = get_migration_status(&mut conn).await?;
    if status.is_up_to_date() {
        info!(
            target: TRACING_TARGET_MIGRATION,
            applied = status.applied_migrations(),
            "Schema is up to date, no migrations to run",
        );
        return Ok(MigrationResult::success(started_at.elapsed(), Vec::new()));
    }

    run_pre_migrate_hook(&mut conn).await?;

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let (versions, mut conn) = tokio::task::spawn_blocking(move || {
        match conn.run_pending_migrations(MIGRATIONS) {
            Ok(applied) => {
                let applied = applied
                    .into_iter()
                    .map(|version| version.to_string())
                    .collect::<Vec<_>>();
                (Ok(applied), conn)
            }
            Err(harness_error) => (Err(harness_error), conn),
        }
    })
    .await
    .map_err(|join_error| PgError::Migration(join_error.into()))?;

    run_post_migrate_hook(conn.deref_mut()).await?;

    let processed_versions = versions.map_err(PgError::Migration)?;

    info!(
        target: TRACING_TARGET_MIGRATION,
        applied = processed_versions.len(),
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "Applied pending schema migrations",
    );

    Ok(MigrationResult::success(
        started_at.elapsed(),
        processed_versions,
    ))
}

async fn run_pre_migrate_hook(conn: &mut PgConnection) -> PgResult<()> {
    custom_hooks::pre_migrate(conn).await.map_err(|hook_error| {
        PgError::Migration(format!("Pre-migration hook failed: {hook_error}").into())
    })
}

async fn run_post_migrate_hook(conn: &mut PgConnection) -> PgResult<()> {
    custom_hooks::post_migrate(conn).await.map_err(|hook_error| {
        PgError::Migration(format!("Post-migration hook failed: {hook_error}").into())
    })
}
