//! Embedded migration runner.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Applies every pending embedded migration on the given connection.
///
/// Diesel's migration harness is synchronous, so the connection is wrapped and
/// moved onto the blocking thread pool for the duration of the run.
///
/// Returns the versions that were applied, oldest first.
pub(crate) async fn run_pending_migrations(mut conn: PooledConnection) -> PgResult<Vec<String>> {
    let start = Instant::now();

    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_MIGRATION,
            "connection is broken before migrations, migrations may fail"
        );
    }

    let mut conn: AsyncConnectionWrapper<PooledConnection> = conn.into();
    let result = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>())
    })
    .await;

    let duration = start.elapsed();
    let versions = result
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "migration task panicked"
            );
            PgError::Migration(err.into())
        })?
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "database migration failed"
            );
            PgError::Migration(err)
        })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "database migrations completed"
    );

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use diesel::pg::Pg;
    use diesel::migration::MigrationSource;

    use super::*;

    #[test]
    fn embeds_the_users_migration() {
        let migrations =
            MigrationSource::<Pg>::migrations(&MIGRATIONS).expect("embedded migrations load");
        let names: Vec<String> = migrations.iter().map(|m| m.name().to_string()).collect();

        assert!(!names.is_empty());
        assert!(names.iter().any(|name| name.ends_with("create_users")), "{names:?}");
    }
}
