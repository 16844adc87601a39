use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde_json::{Map, Value};
use service::record::Record;
use tracing::info;

use crate::errors::{ApiError, READ_FAILED, WRITE_FAILED};
use crate::routes::AppState;

/// GET /data: the whole collection
pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    state
        .store
        .list()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(e, READ_FAILED))
}

/// POST /data: append the body as-is
///
/// Only JSON objects are accepted; any other body is rejected by the
/// extractor with a 422 before the store is read.
pub async fn create_record(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let created = state
        .store
        .append(Value::Object(fields))
        .await
        .map_err(|e| ApiError::from_store(e, WRITE_FAILED))?;
    info!(model = ?service::record::record_key(&created), "record appended");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /data/:key: replace the first record whose `model` equals `key`
pub async fn replace_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Record>, ApiError> {
    let replaced = state
        .store
        .replace(&key, Value::Object(fields))
        .await
        .map_err(|e| ApiError::from_store(e, WRITE_FAILED))?;
    info!(%key, "record replaced");
    Ok(Json(replaced))
}

/// DELETE /data/:key: remove the first match and return it
pub async fn delete_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let removed = state
        .store
        .delete(&key)
        .await
        .map_err(|e| ApiError::from_store(e, WRITE_FAILED))?;
    info!(%key, "record deleted");
    Ok(Json(removed))
}
