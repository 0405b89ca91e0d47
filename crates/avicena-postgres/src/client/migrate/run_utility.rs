//! Migration status and schema inspection utilities.

use diesel::migration::{Migration, MigrationSource};
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::MigrationStatus;
use crate::{MIGRATIONS, PgConnection, PgError, PgResult, TRACING_TARGET_MIGRATION};

#[derive(diesel::prelude::QueryableByName)]
struct MigrationVersionRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    version: String,
}

#[derive(diesel::prelude::QueryableByName)]
struct ExistsRow {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    exists: bool,
}

/// Returns the migration versions recorded as applied, in order.
///
/// A database that has never been migrated has no bookkeeping table yet; it
/// is reported as having no applied versions rather than as an error.
pub async fn get_applied_migrations(conn: &mut PgConnection) -> PgResult<Vec<String>> {
    let result =
        diesel::sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
            .get_results::<MigrationVersionRow>(conn)
            .await;

    let versions = match result {
        Ok(rows) => rows.into_iter().map(|row| row.version).collect(),
        Err(diesel::result::Error::DatabaseError(_, info))
            if info.message().contains("__diesel_schema_migrations") =>
        {
            debug!(
                target: TRACING_TARGET_MIGRATION,
                "Migration bookkeeping table is missing, treating database as unmigrated",
            );
            Vec::new()
        }
        Err(query_error) => return Err(PgError::Query(query_error)),
    };

    Ok(versions)
}

/// Computes applied and pending versions against the embedded migrations.
pub async fn get_migration_status(conn: &mut PgConnection) -> PgResult<MigrationStatus> {
    let applied_versions = get_applied_migrations(conn).await?;

    let mut known_versions: Vec<String> =
        MigrationSource::<diesel::pg::Pg>::migrations(&MIGRATIONS)
            .map_err(PgError::Migration)?
            .iter()
            .map(|migration| migration.name().version().to_string())
            .collect();
    known_versions.sort();

    let pending_versions: Vec<String> = known_versions
        .into_iter()
        .filter(|version| !applied_versions.contains(version))
        .collect();

    Ok(MigrationStatus::new(applied_versions, pending_versions))
}

/// Verifies that the bookkeeping and domain tables exist in the schema.
pub async fn verify_schema_integrity(conn: &mut PgConnection) -> PgResult<bool> {
    const REQUIRED_TABLES: [&str; 2] = ["__diesel_schema_migrations", "attachments"];

    for table_name in REQUIRED_TABLES {
        let query = format!(
            "SELECT EXISTS (SELECT FROM information_schema.tables \
             WHERE table_name = '{table_name}') AS exists"
        );
        let row: ExistsRow = diesel::sql_query(query)
            .get_result(conn)
            .await
            .map_err(PgError::from)?;

        if !row.exists {
            debug!(
                target: TRACING_TARGET_MIGRATION,
                table_name, "Required table is missing from the schema",
            );
            return Ok(false);
        }
    }

    Ok(true)
}
