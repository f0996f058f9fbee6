//! Postgres-backed entity repository.
//!
//! Every operation is a single SQL statement with `RETURNING`, so a request
//! abandoned mid-flight cannot leave a partial write. Update atomicity
//! relies on Postgres row-level locking; there is no in-process locking or
//! optimistic-concurrency token.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StorageError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StorageError |
//! |------------|----------------------|--------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (other) | any other | `Database` |
//! | PoolClosed | N/A | `Database` |
//! | Other | N/A | `Database` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use depot_core::{Entity, EntityId, EntityPatch, Kind, NewEntity, Version};

use super::{EntityRepository, StorageError};

/// Postgres-backed entity repository.
///
/// Holds only a shared connection pool handle, injected at construction.
/// The pool is process-wide and internally synchronized; cloning this
/// struct is cheap and thread-safe.
#[derive(Debug, Clone)]
pub struct PostgresEntityRepository {
    pool: Arc<PgPool>,
}

impl PostgresEntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Entity>, StorageError> {
        let rows: Vec<EntityRow> = sqlx::query_as(
            r#"
            SELECT id, kind, version, data, created_at, updated_at
            FROM entities
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.into_iter().map(Entity::try_from).collect()
    }

    #[instrument(skip(self), fields(entity_id = %id), err)]
    async fn get(&self, id: EntityId) -> Result<Option<Entity>, StorageError> {
        let row: Option<EntityRow> = sqlx::query_as(
            r#"
            SELECT id, kind, version, data, created_at, updated_at
            FROM entities
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.map(Entity::try_from).transpose()
    }

    #[instrument(skip(self, new), fields(kind = %new.kind), err)]
    async fn create(&self, new: NewEntity) -> Result<Entity, StorageError> {
        let id = EntityId::new();

        // Both timestamps come from the same NOW(), so created_at ==
        // updated_at at insertion.
        let row: EntityRow = sqlx::query_as(
            r#"
            INSERT INTO entities (id, kind, version, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, kind, version, data, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(new.kind.as_str())
        .bind(new.version.as_str())
        .bind(serde_json::Value::Object(new.data))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Entity::try_from(row)
    }

    #[instrument(skip(self, patch), fields(entity_id = %id), err)]
    async fn update(&self, id: EntityId, patch: EntityPatch) -> Result<Option<Entity>, StorageError> {
        // Patch fields are validated, non-null values, so a NULL bind can
        // only mean "absent" and COALESCE keeps the stored column.
        let row: Option<EntityRow> = sqlx::query_as(
            r#"
            UPDATE entities
            SET kind = COALESCE($2, kind),
                version = COALESCE($3, version),
                data = COALESCE($4, data),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, version, data, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.kind.as_ref().map(Kind::as_str))
        .bind(patch.version.as_ref().map(Version::as_str))
        .bind(patch.data.map(serde_json::Value::Object))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.map(Entity::try_from).transpose()
    }
}

/// Raw `entities` row as stored.
#[derive(Debug, FromRow)]
struct EntityRow {
    id: Uuid,
    kind: String,
    version: String,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntityRow> for Entity {
    type Error = StorageError;

    // Formats are validated before every write, so a failure here means the
    // table was modified out-of-band.
    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        let kind = Kind::parse(&row.kind)
            .map_err(|e| StorageError::CorruptRow(format!("entity {}: {e}", row.id)))?;
        let version = Version::parse(&row.version)
            .map_err(|e| StorageError::CorruptRow(format!("entity {}: {e}", row.id)))?;
        let data = match row.data {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(StorageError::CorruptRow(format!(
                    "entity {}: data column is not a JSON object",
                    row.id
                )));
            }
        };

        Ok(Entity {
            id: EntityId::from_uuid(row.id),
            kind,
            version,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StorageError::UniqueViolation(msg),
                _ => StorageError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StorageError::Database(format!("connection pool closed in {operation}"))
        }
        other => StorageError::Database(format!("sqlx error in {operation}: {other}")),
    }
}
