//! The entity record and its write-side shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::EntityId;
use crate::kind::Kind;
use crate::version::Version;

/// A persisted entity: a typed JSON document plus server-assigned fields.
///
/// `data` is deliberately schemaless — an open mapping of string keys to
/// arbitrary JSON values. `created_at <= updated_at` holds for every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: Kind,
    pub version: Version,
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating an entity.
///
/// `id` and both timestamps are assigned by the store at insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntity {
    pub kind: Kind,
    pub version: Version,
    pub data: Map<String, Value>,
}

/// Partial update: only present fields are applied, absent fields are left
/// untouched.
///
/// A present field is always a fully validated value — never null — so
/// absence is the only way a field escapes the update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub kind: Option<Kind>,
    pub version: Option<Version>,
    pub data: Option<Map<String, Value>>,
}

impl EntityPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.version.is_none() && self.data.is_none()
    }
}
