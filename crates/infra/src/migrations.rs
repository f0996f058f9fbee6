//! Postgres schema migration registry and executor.
//!
//! Migrations are registered in strictly increasing version order, with
//! paired up/down scripts embedded at compile time. Applied versions are
//! recorded in a `schema_migrations` table, so `apply` is idempotent and
//! `revert` reverses the most recently applied step.

use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: i64,
    name: &'static str,
    up: &'static str,
    down: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_entities",
    up: include_str!("migrations/0001_create_entities.up.sql"),
    down: include_str!("migrations/0001_create_entities.down.sql"),
}];

/// Migration execution error.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {version} ({name}) failed: {source}")]
    Failed {
        version: i64,
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration bookkeeping failed: {0}")]
    Bookkeeping(#[from] sqlx::Error),
}

/// Latest migration version known by this binary.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Apply all pending migrations.
///
/// Re-running against an up-to-date database is a no-op. Each migration
/// runs in its own transaction together with its bookkeeping insert.
pub async fn apply(pool: &PgPool) -> Result<(), MigrationError> {
    ensure_bookkeeping_table(pool).await?;
    let current = current_version(pool).await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|source| MigrationError::Failed {
                version: migration.version,
                name: migration.name,
                source,
            })?;

        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(version = migration.version, name = migration.name, "migration applied");
    }

    Ok(())
}

/// Revert the most recently applied migration using its paired down script.
///
/// A database with nothing applied is left untouched.
pub async fn revert(pool: &PgPool) -> Result<(), MigrationError> {
    ensure_bookkeeping_table(pool).await?;
    let current = current_version(pool).await?;

    let Some(migration) = MIGRATIONS.iter().find(|m| m.version == current) else {
        return Ok(());
    };

    let mut tx = pool.begin().await?;

    sqlx::raw_sql(migration.down)
        .execute(&mut *tx)
        .await
        .map_err(|source| MigrationError::Failed {
            version: migration.version,
            name: migration.name,
            source,
        })?;

    sqlx::query("DELETE FROM schema_migrations WHERE version = $1")
        .bind(migration.version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(version = migration.version, name = migration.name, "migration reverted");

    Ok(())
}

async fn ensure_bookkeeping_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn current_version(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (Option<i64>,) = sqlx::query_as("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;

    Ok(row.0.unwrap_or(0))
}
