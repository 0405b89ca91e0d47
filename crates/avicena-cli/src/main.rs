#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use avicena_server::handler::api_routes;
use avicena_server::middleware::security::body_limit_for_uploads;
use avicena_server::middleware::{RouterExt, RouterOpenApiExt, SecurityHeadersConfig};
use avicena_server::service::ServiceState;
use axum::Router;

use crate::config::Cli;
use crate::server::TRACING_TARGET_SHUTDOWN;

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.validate().context("invalid configuration")?;
    cli.log();

    let state = create_service_state(&cli).await?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state from configuration.
///
/// Connects to Postgres and the object store, then runs pending migrations.
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    ServiceState::new(cli.service.clone())
        .await
        .context("failed to initialize services")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Error handling (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS, security headers, compression, body limits
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let max_body_bytes = body_limit_for_uploads(cli.service.policy.max_bytes);

    api_routes()
        .with_open_api(cli.middleware.openapi.clone())
        .with_state(state)
        .with_security_layer(
            cli.middleware.cors.clone(),
            SecurityHeadersConfig::default(),
            max_body_bytes,
        )
        .with_observability_layer()
        .with_error_handling_layer(cli.server.request_timeout())
}
