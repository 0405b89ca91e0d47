//! PostgreSQL client with connection pooling, lifecycle hooks and migrations.

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

pub(crate) mod custom_hooks;
pub mod migrate;
mod pg_client;
mod pg_config;

pub use self::migrate::{
    MigrationResult, MigrationStatus, PgClientMigrationExt, get_applied_migrations,
    get_migration_status, run_pending_migrations, verify_schema_integrity,
};
pub use self::pg_client::{PgClient, PgConn, PgPoolStatus};
pub use self::pg_config::PgConfig;

/// Deadpool-backed connection pool used by [`PgClient`].
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
/// Connection object checked out of the [`ConnectionPool`].
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
