//! Lifecycle hooks wired into the deadpool connection manager.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, info, warn};

use crate::TRACING_TARGET_CONNECTION;
use crate::client::pg_config::mask_database_url;

/// Establishes a database connection with timing and structured logging.
pub fn setup_callback<C>(database_url: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let started_at = Instant::now();
    info!(
        target: TRACING_TARGET_CONNECTION,
        database_url = %mask_database_url(database_url),
        "Establishing database connection",
    );

    async move {
        let result = C::establish(database_url).await;
        match &result {
            Ok(_) => info!(
                target: TRACING_TARGET_CONNECTION,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Database connection established",
            ),
            Err(connection_error) => error!(
                target: TRACING_TARGET_CONNECTION,
                error = %connection_error,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Failed to establish database connection",
            ),
        }
        result
    }
    .boxed()
}

/// Logs every connection added to the pool.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        warn!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_create",
            "Connection reported broken immediately after creation",
        );
    } else {
        info!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_create",
            age_secs = metrics.age().as_secs(),
            "Connection added to the pool",
        );
    }

    // Note: should never return an error.
    Ok(())
}

/// Logs connections about to be recycled for reuse.
pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        warn!(
            target: TRACING_TARGET_CONNECTION,
            hook = "pre_recycle",
            age_secs = metrics.age().as_secs(),
            "Broken connection handed to recycling",
        );
    } else {
        debug!(
            target: TRACING_TARGET_CONNECTION,
            hook = "pre_recycle",
            age_secs = metrics.age().as_secs(),
            "Recycling pooled connection",
        );
    }

    // Note: should never return an error.
    Ok(())
}

/// Logs connections returned to the pool after recycling.
pub fn post_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        error!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_recycle",
            age_secs = metrics.age().as_secs(),
            "Connection still broken after recycling",
        );
    } else {
        debug!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_recycle",
            age_secs = metrics.age().as_secs(),
            "Connection returned to the pool",
        );
    }

    // Note: should never return an error.
    Ok(())
}
