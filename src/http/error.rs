//! Mapping of [`NotesError`] to HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::NotesError;

/// Error returned by route handlers. Renders as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub NotesError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            NotesError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            NotesError::NotFound(_) => StatusCode::NOT_FOUND,
            NotesError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            NotesError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match &self.0 {
            NotesError::InvalidIdentifier(_) => "Invalid note ID".to_string(),
            NotesError::NotFound(_) => "Note not found".to_string(),
            NotesError::Validation { .. } => self.0.to_string(),
            NotesError::StoreUnavailable(_) => "Document store unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<NotesError> for ApiError {
    fn from(err: NotesError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(NotesError::validation("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(NotesError::InvalidIdentifier(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
