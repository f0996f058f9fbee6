//! Entity repository: insert, point lookup, ordered list, partial update.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryEntityRepository;
pub use postgres::PostgresEntityRepository;

use async_trait::async_trait;
use thiserror::Error;

use depot_core::{Entity, EntityId, EntityPatch, NewEntity};

/// Storage operation failure.
///
/// Opaque infrastructure errors: the service layer maps every variant to a
/// 500 without leaking detail to clients. No variant is retried here —
/// retry policy, if any, belongs to the connection layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique constraint was violated (e.g. a duplicate generated id).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Driver or connection failure.
    #[error("{0}")]
    Database(String),

    /// A persisted row no longer satisfies the domain formats.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Storage operations for entities.
///
/// Backends are injected at construction (a pool handle for Postgres, a map
/// for tests), keeping the service layer substitutable. `None` from `get`
/// and `update` is the normal not-found outcome, distinct from
/// [`StorageError`].
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// All entities, newest first (`created_at` descending). An empty store
    /// yields an empty vec, never an error.
    async fn list(&self) -> Result<Vec<Entity>, StorageError>;

    /// Point lookup by primary key.
    async fn get(&self, id: EntityId) -> Result<Option<Entity>, StorageError>;

    /// Insert a new row. The store assigns a fresh id and sets both
    /// timestamps to the insertion instant; the full materialized row is
    /// returned so callers see the server-assigned fields immediately.
    async fn create(&self, new: NewEntity) -> Result<Entity, StorageError>;

    /// Apply the present fields of `patch`, refresh `updated_at`
    /// unconditionally, and return the full post-update row. Returns `None`
    /// without side effects when no row has `id`.
    async fn update(&self, id: EntityId, patch: EntityPatch) -> Result<Option<Entity>, StorageError>;
}
