use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use depot_core::DomainError;
use depot_infra::StorageError;

/// Flat `{"error": ...}` body shared by every failure response.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

pub fn validation_error_to_response(err: DomainError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "Entity not found")
}

pub fn invalid_id() -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "Invalid entity id")
}

/// Storage failures stay opaque to clients: the detail is logged, the
/// response carries none of it.
pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    tracing::error!(error = %err, "storage operation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}
