//! `Version` value object: strict three-part semantic version.

use core::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};

// Strict major.minor.patch; no pre-release or build suffixes.
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid version regex"));

/// Semantic version tag of an entity, e.g. `1.0.0`.
///
/// Only constructible through [`Version::parse`]; a held value always
/// matches `major.minor.patch`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn parse(value: &str) -> DomainResult<Self> {
        if VERSION_RE.is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(DomainError::invalid_format(format!(
                "version must be in major.minor.patch format (e.g. 1.0.0), got '{value}'"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Version::parse(&value).map_err(serde::de::Error::custom)
    }
}
