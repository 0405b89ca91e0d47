//! Pooled PostgreSQL client handle.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use deadpool::Runtime;
use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use tracing::{error, info, warn};

use crate::client::{ConnectionPool, PgConfig, PooledConnection, custom_hooks};
use crate::{PgError, PgResult, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// Point-in-time snapshot of connection pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolStatus {
    /// Maximum number of connections the pool may hold.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Connections currently idle and ready for use.
    pub available: usize,
    /// Tasks currently waiting for a connection.
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Returns the fraction of the pool currently in use.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            return 0.0;
        }
        let in_use = self.size.saturating_sub(self.available);
        in_use as f64 / self.max_size as f64
    }

    /// Returns `true` if the pool is close to exhaustion.
    #[must_use]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

/// Cloneable handle to the PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

impl PgClient {
    /// Creates a new client and its connection pool.
    ///
    /// The pool is built eagerly but connections are only established on
    /// first use. Use [`PgClient::verify_connectivity`] to fail fast at
    /// startup instead of on the first query.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.postgres_max_connections,
            "Initializing database client",
        );

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);

        let manager =
            AsyncDieselConnectionManager::new_with_config(&config.postgres_url, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle))
            .post_recycle(Hook::sync_fn(custom_hooks::post_recycle))
            .build()
            .map_err(|build_error| {
                error!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %build_error,
                    "Failed to build the connection pool",
                );
                PgError::Unexpected(build_error.to_string().into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Verifies database connectivity by executing a trivial query.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn verify_connectivity(&self) -> PgResult<()> {
        use diesel_async::RunQueryDsl;

        #[derive(diesel::prelude::QueryableByName)]
        struct ConnectivityTest {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            result: i32,
        }

        let mut conn = self.get_pooled_connection().await?;
        let _row: ConnectivityTest = diesel::sql_query("SELECT 1 AS result")
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        info!(
            target: TRACING_TARGET_CONNECTION,
            max_connections = self.inner.config.postgres_max_connections,
            connection_timeout = ?self.inner.config.connection_timeout(),
            idle_timeout = ?self.inner.config.idle_timeout(),
            "Database connectivity verified",
        );

        Ok(())
    }

    /// Fetches a connection from the pool.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let conn = self.get_pooled_connection().await?;
        Ok(PgConn::new(conn))
    }

    /// Fetches a raw pooled connection object.
    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        let started_at = Instant::now();
        let conn = self.inner.pool.get().await.map_err(PgError::from)?;

        let elapsed = started_at.elapsed();
        if elapsed.as_millis() > 100 {
            warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow connection acquisition from the pool",
            );
        }

        Ok(conn)
    }

    /// Returns a snapshot of connection pool usage.
    #[must_use]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Returns the configuration the client was created with.
    #[must_use]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_status", &self.pool_status())
            .finish_non_exhaustive()
    }
}

/// Pooled connection wrapper that derefs to [`crate::PgConnection`].
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Wraps a pooled connection object.
    #[must_use]
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_status_utilization() {
        let status = PgPoolStatus {
            max_size: 10,
            size: 8,
            available: 2,
            waiting: 0,
        };
        assert!((status.utilization() - 0.6).abs() < f64::EPSILON);
        assert!(!status.is_under_pressure());
    }

    #[test]
    fn test_pool_status_pressure() {
        let status = PgPoolStatus {
            max_size: 10,
            size: 10,
            available: 0,
            waiting: 3,
        };
        assert!(status.is_under_pressure());

        let empty = PgPoolStatus {
            max_size: 0,
            size: 0,
            available: 0,
            waiting: 0,
        };
        assert!(!empty.is_under_pressure());
    }
}
