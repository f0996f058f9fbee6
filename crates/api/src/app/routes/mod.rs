use axum::{routing::get, Router};

pub mod entities;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(entities::router())
}
