//! System health monitoring handlers.

use aide::axum::ApiRouter;
use axum::extract::State;
use axum::http::StatusCode;
use jiff::Timestamp;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{MonitorStatus, ServiceStatus};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "avicena_server::handler::monitors";

/// Reports service health, version, uptime and pool pressure.
///
/// The endpoint stays unauthenticated so load balancers and uptime
/// probes can poll it. A saturated connection pool degrades the status
/// without failing the request.
#[tracing::instrument(skip(state))]
async fn health_status(
    State(state): State<ServiceState>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let pool = state.postgres.pool_status();

    let status = if pool.is_under_pressure() {
        ServiceStatus::Degraded
    } else {
        ServiceStatus::Healthy
    };

    let response = MonitorStatus {
        checked_at: Timestamp::now(),
        status,
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime_secs: state.uptime_secs(),
        pool: pool.into(),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = ?status,
        pool_waiting = response.pool.waiting,
        "health status reported"
    );

    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new().api_route("/monitor/health", get(health_status))
}
