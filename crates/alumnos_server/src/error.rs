//! HTTP error mapping.
//!
//! # Invariants
//! - Single errors render as `{ "error": string }`.
//! - Validation failures render as `{ "errors": string[] }`.
//! - Store failures surface their underlying message unchanged.

use alumnos_core::model::validation::MSG_ID_NOT_NUMERIC;
use alumnos_core::AlumnoServiceError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a single message.
    BadRequest(String),
    /// 400 with the ordered violation list.
    Validation(Vec<String>),
    /// 404.
    NotFound(String),
    /// 500 with the underlying message.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AlumnoServiceError> for ApiError {
    fn from(value: AlumnoServiceError) -> Self {
        match value {
            AlumnoServiceError::InvalidInput(message) => Self::BadRequest(message),
            AlumnoServiceError::ValidationFailed(errors) => Self::Validation(errors),
            err @ AlumnoServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            AlumnoServiceError::Store(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

/// A path segment that is not valid UTF-8 never reaches id parsing.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::BadRequest(MSG_ID_NOT_NUMERIC.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) => json!({ "errors": errors }),
            Self::Internal(message) => {
                error!("event=http_error module=http status=error error={message}");
                json!({ "error": message })
            }
            Self::BadRequest(message) | Self::NotFound(message) => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use alumnos_core::{AlumnoServiceError, RepoError};
    use axum::http::StatusCode;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                AlumnoServiceError::InvalidInput("El ID debe ser un número".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AlumnoServiceError::ValidationFailed(vec!["x".to_string()]),
                StatusCode::BAD_REQUEST,
            ),
            (AlumnoServiceError::NotFound(1), StatusCode::NOT_FOUND),
            (
                AlumnoServiceError::Store(RepoError::UninitializedStorage),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn not_found_carries_spanish_message() {
        let err = ApiError::from(AlumnoServiceError::NotFound(9));
        assert!(matches!(err, ApiError::NotFound(message) if message == "Alumno no encontrado"));
    }
}
