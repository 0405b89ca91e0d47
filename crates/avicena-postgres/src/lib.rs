#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::borrow::Cow;

use crate::types::ConstraintViolation;

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Tracing target for database client lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "avicena_postgres::client";
/// Tracing target for query execution.
pub const TRACING_TARGET_QUERY: &str = "avicena_postgres::queries";
/// Tracing target for schema migrations.
pub const TRACING_TARGET_MIGRATION: &str = "avicena_postgres::migrations";
/// Tracing target for connection pool management.
pub const TRACING_TARGET_CONNECTION: &str = "avicena_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PgPoolStatus, PooledConnection, get_applied_migrations, get_migration_status,
    run_pending_migrations, verify_schema_integrity,
};

/// Error types re-exported from the underlying database stack.
pub mod error {
    use std::borrow::Cow;

    /// Boxed error type for error sources that are only reported, never matched.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::ConnectionError as DieselConnectionError;
    pub use diesel::result::Error as DieselError;
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;

    /// Pool error as produced by the deadpool-backed connection manager.
    pub type DeadpoolError = deadpool::managed::PoolError<DieselPoolError>;

    /// Attaches an operator-facing hint to an error value.
    pub trait ErrorHint {
        /// Returns a short suggestion for resolving the error.
        fn hint(&self) -> Cow<'static, str>;
    }

    impl ErrorHint for TimeoutType {
        fn hint(&self) -> Cow<'static, str> {
            match self {
                TimeoutType::Wait => {
                    Cow::Borrowed("Consider increasing the pool size or the connection timeout")
                }
                TimeoutType::Create => {
                    Cow::Borrowed("Verify the database is reachable and accepting connections")
                }
                TimeoutType::Recycle => {
                    Cow::Borrowed("Connections may be going stale, consider lowering the idle timeout")
                }
            }
        }
    }
}

/// Error type for all database operations in this crate.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid client or pool configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timed out while waiting for a pooled connection.
    #[error("Connection pool timeout: {0:?}")]
    Timeout(error::TimeoutType),

    /// Failed to establish a connection to the database.
    #[error("Connection error: {0}")]
    Connection(#[from] error::DieselConnectionError),

    /// Failed to apply or inspect schema migrations.
    #[error("Migration error: {0}")]
    Migration(error::BoxError),

    /// Query construction or execution failed.
    #[error("Query error: {0}")]
    Query(#[from] error::DieselError),

    /// Unexpected error that does not fit any other variant.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns the name of the violated database constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Query(error::DieselError::DatabaseError(_, info)) => info.constraint_name(),
            _ => None,
        }
    }

    /// Returns the typed constraint violation if the constraint name is recognized.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns `true` if the operation may succeed when retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(error::DieselConnectionError::BadConnection(_))
        )
    }

    /// Returns `true` if retrying the operation is pointless.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(error: error::DeadpoolError) -> Self {
        use error::{DeadpoolError, DieselPoolError};
        match error {
            DeadpoolError::Timeout(timeout_type) => Self::Timeout(timeout_type),
            DeadpoolError::Backend(DieselPoolError::QueryError(query_error)) => {
                Self::Query(query_error)
            }
            DeadpoolError::Backend(DieselPoolError::ConnectionError(connection_error)) => {
                Self::Connection(connection_error)
            }
            DeadpoolError::PostCreateHook(hook_error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CONNECTION,
                    error = %hook_error,
                    "Connection pool post-create hook failed",
                );
                Self::Unexpected(Cow::Owned(format!("Post-create hook error: {hook_error}")))
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!(
                    target: TRACING_TARGET_CONNECTION,
                    "Connection pool was built without an async runtime",
                );
                Self::Unexpected(Cow::Borrowed(
                    "No async runtime was specified for the connection pool",
                ))
            }
            DeadpoolError::Closed => Self::Connection(error::DieselConnectionError::InvalidConnectionUrl(
                "Connection pool is closed".to_owned(),
            )),
        }
    }
}

/// Specialized [`Result`] alias for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;
