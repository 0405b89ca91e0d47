//! HTTP server startup and lifecycle management.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{ServerError, ServerResult, TRACING_TARGET_STARTUP, shutdown_signal};

/// Starts an HTTP server with graceful shutdown.
///
/// This function validates the configuration, binds to the specified address,
/// and starts serving requests with support for graceful shutdown.
///
/// # Arguments
///
/// * `app` - The Axum router to serve
/// * `server_config` - Server configuration including host, port, and timeouts
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    // Validate configuration before starting
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = validation_error.to_string(),
            "Invalid server configuration"
        );

        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();

    // Bind to the address with error handling
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                "Server is ready and listening for connections"
            );

            listener
        }
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_STARTUP,
                addr = %server_addr,
                error = listener_err.to_string(),
                "Failed to bind to address"
            );

            return Err(ServerError::BindError {
                address: server_addr.to_string(),
                source: listener_err,
            });
        }
    };

    // Start server
    let shutdown_signal = shutdown_signal(server_config.shutdown_timeout());
    serve_with_shutdown(&server_config, || async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
    })
    .await
    .map_err(ServerError::Runtime)
}
