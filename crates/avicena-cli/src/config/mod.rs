//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, TLS, shutdown
//! ├── middleware: MiddlewareConfig # CORS, OpenAPI
//! └── service: ServiceConfig       # Postgres, object storage, upload policy
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Configure database and server
//! avicena-cli --postgres-url "postgresql://..." --port 8080
//!
//! # Or via environment variables
//! POSTGRES_URL="postgresql://..." PORT=8080 avicena-cli
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use avicena_server::service::ServiceConfig;
use clap::Parser;
pub use middleware::MiddlewareConfig;
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::server::TRACING_TARGET_STARTUP;

/// Tracing target for configuration events.
pub(crate) const TRACING_TARGET_CONFIG: &str = "avicena_cli::config";

/// Complete CLI configuration.
///
/// Combines all configuration groups for the attachment service:
/// - [`ServerConfig`]: Network binding and TLS
/// - [`MiddlewareConfig`]: HTTP middleware (CORS, OpenAPI)
/// - [`ServiceConfig`]: External service connections (Postgres, object storage)
///   and the upload acceptance policy
#[derive(Debug, Clone, Parser)]
#[command(name = "avicena")]
#[command(about = "Avicena attachment service")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, OpenAPI).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// External service configuration (database, object storage, policy).
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as it ensures
    /// .env files are loaded before clap parses arguments, allowing environment
    /// variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// This should be called before parsing CLI arguments so that clap's `env`
    /// feature can pick up values from .env files.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_max_connections = self.service.postgres.postgres_max_connections,
            postgres_connection_timeout_secs = ?self.service.postgres.postgres_connection_timeout_secs,
            postgres_idle_timeout_secs = ?self.service.postgres.postgres_idle_timeout_secs,
            "Database configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            scheme = %self.service.storage.scheme,
            bucket = %self.service.storage.bucket,
            "Storage configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_upload_bytes = self.service.policy.max_bytes,
            presign_expiry_secs = self.service.policy.presign_expiry_secs,
            allowed_mime_types = self.service.policy.allowed_mime_types.len(),
            "Upload policy"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "tls").then_some("tls"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
