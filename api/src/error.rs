//! Unified error types for the CNES API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Repository and service errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::validation::{FieldError, ValidationErrors};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation, carrying the user-facing message
    #[error("{0}")]
    AlreadyExists(String),

    /// A related row does not exist (foreign key or unresolved natural key)
    #[error("{0}")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Path, query string or body could not be extracted
    #[error("{message}")]
    Rejection { status: StatusCode, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape is reported per field
            JsonRejection::JsonDataError(e) => {
                let FieldError { field, message } = json_data_field_error(&e.body_text());
                AppError::Domain(DomainError::Validation(ValidationErrors::single(
                    &field, message,
                )))
            }
            other => AppError::Rejection {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Field and message from a serde data error, which reads
/// `<path>: <message> at line <l> column <c>` with the path omitted at the root
fn json_data_field_error(text: &str) -> FieldError {
    let detail = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    let (path, message) = match detail.split_once(": ") {
        Some((path, rest)) if !path.contains(' ') => (Some(path), rest),
        _ => (None, detail),
    };
    let message = message
        .rsplit_once(" at line ")
        .map_or(message, |(message, _)| message);
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name);

    let field = match (path, missing) {
        (Some(path), Some(name)) => format!("{}.{}", path, name),
        (Some(path), None) => path.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => "body".to_string(),
    };
    FieldError {
        field,
        message: message.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;

        let (status, error, details) = match self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::BAD_REQUEST, "Already exists", Some(msg))
            }
            AppError::Domain(DomainError::InvalidReference(msg)) => {
                (StatusCode::BAD_REQUEST, "Invalid reference", Some(msg))
            }
            AppError::Domain(DomainError::Validation(errors)) => {
                let details = errors.to_string();
                fields = Some(errors.fields().to_vec());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Validation error",
                    Some(details),
                )
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg)),
            AppError::Rejection { status, message } => {
                tracing::debug!("Rejected request: {}", message);
                (status, "Invalid request", Some(message))
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::Domain(DomainError::NotFound("Mantenedora 1".into()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unique_violation_maps_to_400() {
        let err = AppError::Domain(DomainError::AlreadyExists("CNPJ já cadastrado".into()));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_reference_maps_to_400() {
        let err = AppError::Domain(DomainError::InvalidReference(
            "Estabelecimento não encontrado".into(),
        ));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_maps_to_422() {
        let errors = ValidationErrors::single("cnpj_mantenedora", "CNPJ deve ter 14 dígitos");
        let err = AppError::Domain(DomainError::Validation(errors));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_errors_are_hidden() {
        let err = AppError::Domain(DomainError::Database("connection reset".into()));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejection_keeps_its_status() {
        let err = AppError::Rejection {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".into(),
        };
        assert_eq!(status_of(err), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn missing_field_names_the_field() {
        let error = json_data_field_error(
            "Failed to deserialize the JSON body into the target type: \
             missing field `nome_razao_social_mantenedora` at line 1 column 39",
        );
        assert_eq!(error.field, "nome_razao_social_mantenedora");
        assert_eq!(error.message, "missing field `nome_razao_social_mantenedora`");
    }

    #[test]
    fn wrong_type_uses_serde_path() {
        let error = json_data_field_error(
            "Failed to deserialize the JSON body into the target type: \
             codigo_banco: invalid type: integer `1`, expected a string at line 1 column 17",
        );
        assert_eq!(error.field, "codigo_banco");
        assert_eq!(error.message, "invalid type: integer `1`, expected a string");
    }

    #[test]
    fn root_shape_error_falls_back_to_body() {
        let error = json_data_field_error(
            "Failed to deserialize the JSON body into the target type: \
             invalid type: sequence, expected struct NewMantenedora at line 1 column 0",
        );
        assert_eq!(error.field, "body");
    }

    #[test]
    fn already_exists_displays_bare_message() {
        let err = DomainError::AlreadyExists("CNPJ já cadastrado".into());
        assert_eq!(err.to_string(), "CNPJ já cadastrado");
    }
}
