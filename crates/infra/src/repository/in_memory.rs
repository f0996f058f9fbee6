//! In-memory entity repository.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use depot_core::{Entity, EntityId, EntityPatch, NewEntity};

use super::{EntityRepository, StorageError};

/// In-memory entity repository.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEntityRepository {
    entities: RwLock<HashMap<EntityId, Entity>>,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn list(&self) -> Result<Vec<Entity>, StorageError> {
        let entities = self
            .entities
            .read()
            .map_err(|_| StorageError::Database("lock poisoned".to_string()))?;

        let mut all: Vec<Entity> = entities.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get(&self, id: EntityId) -> Result<Option<Entity>, StorageError> {
        let entities = self
            .entities
            .read()
            .map_err(|_| StorageError::Database("lock poisoned".to_string()))?;

        Ok(entities.get(&id).cloned())
    }

    async fn create(&self, new: NewEntity) -> Result<Entity, StorageError> {
        let now = Utc::now();
        let entity = Entity {
            id: EntityId::new(),
            kind: new.kind,
            version: new.version,
            data: new.data,
            created_at: now,
            updated_at: now,
        };

        let mut entities = self
            .entities
            .write()
            .map_err(|_| StorageError::Database("lock poisoned".to_string()))?;

        match entities.entry(entity.id) {
            Entry::Occupied(_) => Err(StorageError::UniqueViolation(format!(
                "entity id {} already exists",
                entity.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    async fn update(&self, id: EntityId, patch: EntityPatch) -> Result<Option<Entity>, StorageError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| StorageError::Database("lock poisoned".to_string()))?;

        let Some(entity) = entities.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(kind) = patch.kind {
            entity.kind = kind;
        }
        if let Some(version) = patch.version {
            entity.version = version;
        }
        if let Some(data) = patch.data {
            entity.data = data;
        }
        entity.updated_at = Utc::now();

        Ok(Some(entity.clone()))
    }
}
