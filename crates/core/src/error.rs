//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is client-caused: malformed input or a caller-logic error.
/// Infrastructure failures belong elsewhere. Messages are user-facing and
/// surface verbatim in HTTP error bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed its format pattern.
    #[error("{0}")]
    InvalidFormat(String),

    /// A required field was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An update request carried no fields at all.
    #[error("No fields to update")]
    EmptyUpdate,

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
