//! Request handlers

mod documents;
mod reading;
mod sync;

pub use documents::*;
pub use reading::*;
pub use sync::*;

use axum::http::StatusCode;
use axum::Json;
use pagemark_core::LoadError;
use serde::Serialize;
use uuid::Uuid;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Error body shared by handlers that report a reason
pub(crate) type ApiError = (StatusCode, String);

/// Validate a document id from the path
pub(crate) fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid document id".to_string()))
}

/// Map a document load failure onto a response
pub(crate) fn load_error(err: LoadError) -> ApiError {
    match err {
        LoadError::ContentUnavailable(_) => {
            (StatusCode::NOT_FOUND, "content unavailable".to_string())
        }
        LoadError::Malformed(reason) => {
            tracing::error!("Stored document is malformed: {}", reason);
            (StatusCode::INTERNAL_SERVER_ERROR, "content unavailable".to_string())
        }
    }
}
