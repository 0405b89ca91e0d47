//! Monitor response types.

use avicena_postgres::PgPoolStatus;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse health classification of the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// All dependencies respond within expected bounds.
    Healthy,
    /// The service responds, but a dependency is under pressure.
    Degraded,
}

/// Point-in-time snapshot of connection pool usage.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatus {
    /// Maximum number of connections the pool may hold.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Connections currently idle and ready for use.
    pub available: usize,
    /// Tasks currently waiting for a connection.
    pub waiting: usize,
    /// Fraction of the pool currently in use.
    pub utilization: f64,
}

impl From<PgPoolStatus> for PoolStatus {
    fn from(status: PgPoolStatus) -> Self {
        Self {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
            utilization: status.utilization(),
        }
    }
}

/// System monitoring status response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Overall system health status.
    pub status: ServiceStatus,
    /// Application version.
    pub version: String,
    /// Seconds the service has been running.
    pub uptime_secs: u64,
    /// Database connection pool snapshot.
    pub pool: PoolStatus,
}
