//! Hooks executed around migration runs.

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::PoolableConnection;
use tracing::{debug, warn};

use crate::{PgResult, TRACING_TARGET_MIGRATION};

/// Runs before pending migrations are applied.
pub async fn pre_migrate(conn: &mut AsyncPgConnection) -> PgResult<()> {
    if conn.is_broken() {
        warn!(
            target: TRACING_TARGET_MIGRATION,
            hook = "pre_migrate",
            "Connection reported broken before the migration run",
        );
    } else {
        debug!(
            target: TRACING_TARGET_MIGRATION,
            hook = "pre_migrate",
            "Starting migration run",
        );
    }

    Ok(())
}

/// Runs after pending migrations are applied.
pub async fn post_migrate(conn: &mut AsyncPgConnection) -> PgResult<()> {
    if conn.is_broken() {
        warn!(
            target: TRACING_TARGET_MIGRATION,
            hook = "post_migrate",
            "Connection reported broken after the migration run",
        );
    } else {
        debug!(
            target: TRACING_TARGET_MIGRATION,
            hook = "post_migrate",
            "Migration run finished",
        );
    }

    Ok(())
}
