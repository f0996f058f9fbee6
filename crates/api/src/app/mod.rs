//! HTTP application wiring (Axum router + service wiring).
//!
//! Folder structure:
//! - `services.rs`: per-process state (the injected repository handle)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs feeding the schema validator
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use depot_infra::EntityRepository;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(repository: Arc<dyn EntityRepository>) -> Router {
    let services = Arc::new(AppServices::new(repository));

    routes::router().layer(ServiceBuilder::new().layer(Extension(services)))
}
