//! `depot-infra` — storage backends and schema migrations.
//!
//! The repository here is the only component permitted to touch storage;
//! everything above it works with `depot-core` types.

pub mod migrations;
pub mod repository;

pub use repository::{EntityRepository, InMemoryEntityRepository, PostgresEntityRepository, StorageError};
