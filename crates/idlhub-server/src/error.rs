//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use idlhub_core::error::CatalogError;

/// Handler-level error that knows its HTTP representation.
///
/// Missing catalog components come back 404 with the human-readable
/// message as a JSON string body; everything else is a 500 whose detail
/// stays in the server log.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProjectNotFound { .. }
            | CatalogError::TypeNotFound { .. }
            | CatalogError::VersionNotFound { .. } => Self::NotFound(err.to_string()),
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(message)).into_response()
            }
            Self::Internal(err) => {
                error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json("internal error")).into_response()
            }
        }
    }
}
