//! Entity routes: list, fetch, create, partial update.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use depot_core::EntityId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/entities/", get(list_entities).post(create_entity))
        .route("/entities/:id", get(get_entity).put(update_entity))
}

pub async fn list_entities(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.repository().list().await {
        Ok(entities) => (StatusCode::OK, Json(entities)).into_response(),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn get_entity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: EntityId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id(),
    };

    match services.repository().get(id).await {
        Ok(Some(entity)) => (StatusCode::OK, Json(entity)).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn create_entity(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateEntityRequest>,
) -> axum::response::Response {
    let new = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error_to_response(e),
    };

    match services.repository().create(new).await {
        Ok(entity) => (StatusCode::CREATED, Json(entity)).into_response(),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn update_entity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateEntityRequest>,
) -> axum::response::Response {
    // Validation first: an empty or malformed body is reported before the
    // id is even looked at.
    let patch = match body.validate() {
        Ok(v) => v,
        Err(e) => return errors::validation_error_to_response(e),
    };

    let id: EntityId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::invalid_id(),
    };

    match services.repository().update(id, patch).await {
        Ok(Some(entity)) => (StatusCode::OK, Json(entity)).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::storage_error_to_response(e),
    }
}
