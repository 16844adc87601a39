use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::StoreError;
use tracing::{error, info};

pub const READ_FAILED: &str = "Could not read file";
pub const WRITE_FAILED: &str = "Could not write to file";
pub const NOT_FOUND: &str = "Data not found";

/// Error returned by the record handlers, rendered as `{"error": msg}`.
/// The message is one of the fixed strings above; store details only go to the log.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// Map a store failure: missing key is a 404, anything else a 500 carrying `fallback`.
    pub fn from_store(err: StoreError, fallback: &'static str) -> Self {
        match err {
            StoreError::NotFound(msg) => {
                info!(reason = %msg, "record lookup missed");
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND)
            }
            other => {
                error!(error = %other, "record store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}
