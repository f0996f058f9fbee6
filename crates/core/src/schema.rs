//! Request schema validation: the only gate between raw input and the store.
//!
//! Create and update requests pass through here before any storage
//! interaction; a row can therefore never hold a malformed `kind` or
//! `version`.

use serde_json::{Map, Value};

use crate::entity::{EntityPatch, NewEntity};
use crate::error::{DomainError, DomainResult};
use crate::kind::Kind;
use crate::version::Version;

/// Validate a create request. All three fields are required; `data` must be
/// a JSON object.
pub fn validate_create(
    kind: Option<&str>,
    version: Option<&str>,
    data: Option<&Value>,
) -> DomainResult<NewEntity> {
    let kind = Kind::parse(kind.ok_or(DomainError::MissingField("kind"))?)?;
    let version = Version::parse(version.ok_or(DomainError::MissingField("version"))?)?;
    let data = validate_data(data.ok_or(DomainError::MissingField("data"))?)?;

    Ok(NewEntity { kind, version, data })
}

/// Validate an update request. Any subset of fields may be present; each
/// present field is held to the create rules. Zero present fields is a
/// caller-logic error, reported as [`DomainError::EmptyUpdate`] rather than
/// a format failure.
pub fn validate_update(
    kind: Option<&str>,
    version: Option<&str>,
    data: Option<&Value>,
) -> DomainResult<EntityPatch> {
    let patch = EntityPatch {
        kind: kind.map(Kind::parse).transpose()?,
        version: version.map(Version::parse).transpose()?,
        data: data.map(validate_data).transpose()?,
    };

    if patch.is_empty() {
        return Err(DomainError::EmptyUpdate);
    }

    Ok(patch)
}

fn validate_data(value: &Value) -> DomainResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        other => Err(DomainError::invalid_format(format!(
            "data must be a JSON object, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
