//! `Kind` value object: the namespaced type tag of an entity.

use core::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

/// Canonical kind pattern: lowercase reverse-domain namespace, a slash, and
/// a TypeName starting with an uppercase letter.
static KIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9.-]+/[A-Z][A-Za-z0-9_]*$").expect("valid kind regex"));

/// Namespaced type tag for an entity, e.g. `freelearning.org/Project`.
///
/// A `Kind` can only be constructed through [`Kind::parse`], so a held value
/// always satisfies the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Kind(String);

impl Kind {
    pub fn parse(value: &str) -> DomainResult<Self> {
        if KIND_RE.is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(DomainError::invalid_format(format!(
                "kind must be in <domain>/<TypeName> format (e.g. freelearning.org/Project), got '{value}'"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Kind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Kind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Deserialization goes through `parse` so a `Kind` read back from storage or
// JSON still upholds the format invariant.
impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Kind::parse(&value).map_err(serde::de::Error::custom)
    }
}
