//! Application state and dependency injection.

mod service_config;

use std::sync::Arc;
use std::time::Instant;

use avicena_attach::AttachmentEngine;
use avicena_object::ObjectStore;
use avicena_postgres::PgClient;

pub use crate::service::service_config::ServiceConfig;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub engine: AttachmentEngine<PgClient>,
    pub started_at: Instant,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to all external services and loads required resources.
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        let postgres = config.connect_postgres().await?;
        let storage: Arc<dyn ObjectStore> = Arc::new(config.connect_storage()?);

        let service_state = Self {
            engine: AttachmentEngine::new(postgres.clone(), storage, config.policy),
            postgres,
            started_at: Instant::now(),
        };

        Ok(service_state)
    }

    /// Returns the number of whole seconds since the state was created.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(engine: AttachmentEngine<PgClient>);
