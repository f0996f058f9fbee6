//! Request DTOs.
//!
//! Fields arrive optional so the schema validator, not serde, decides which
//! absences are errors and reports them with uniform messages.

use serde::Deserialize;
use serde_json::Value;

use depot_core::schema;
use depot_core::{DomainResult, EntityPatch, NewEntity};

#[derive(Debug, Deserialize)]
pub struct CreateEntityRequest {
    pub kind: Option<String>,
    pub version: Option<String>,
    pub data: Option<Value>,
}

impl CreateEntityRequest {
    pub fn validate(&self) -> DomainResult<NewEntity> {
        schema::validate_create(self.kind.as_deref(), self.version.as_deref(), self.data.as_ref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntityRequest {
    pub kind: Option<String>,
    pub version: Option<String>,
    pub data: Option<Value>,
}

impl UpdateEntityRequest {
    pub fn validate(&self) -> DomainResult<EntityPatch> {
        schema::validate_update(self.kind.as_deref(), self.version.as_deref(), self.data.as_ref())
    }
}
