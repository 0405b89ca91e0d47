//! Middleware configuration for the HTTP server.
//!
//! This module provides CLI-configurable middleware settings including CORS
//! and OpenAPI documentation.
//!
//! All middleware configs are re-exported from `avicena-server` and support
//! both CLI arguments and environment variables.
//!
//! # Example
//!
//! ```bash
//! # Configure CORS origins and the OpenAPI document path
//! avicena-cli --allowed-origins "https://example.com" --open-api-json "/docs/api.json"
//! ```

use avicena_server::middleware::{CorsConfig, OpenApiConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS and OpenAPI settings.
///
/// This struct groups all HTTP middleware configurations that can be
/// customized via CLI arguments or environment variables.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    ///
    /// Controls which origins can access the API and what credentials
    /// are allowed in cross-origin requests.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// OpenAPI documentation configuration.
    ///
    /// Configures the paths where the OpenAPI JSON specification
    /// and Scalar UI are served.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            "OpenAPI configuration"
        );
    }
}
