//! Schema migration management for the database client.
//!
//! ## Features
//!
//! - Embedded migrations applied at startup without external tooling.
//! - Status inspection listing applied and pending versions.
//! - Integrity verification of required tables after migration.

mod client_ext;
pub(crate) mod custom_hooks;
mod migrate_result;
mod run_migration;
mod run_utility;

pub use self::client_ext::PgClientMigrationExt;
pub use self::migrate_result::{MigrationResult, MigrationStatus};
pub use self::run_migration::run_pending_migrations;
pub use self::run_utility::{get_applied_migrations, get_migration_status, verify_schema_integrity};
