use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::show_message_headers;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Resource not found")]
    NotFound,

    #[error("{}", validation_summary(.0))]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    UnprocessableEntity(String),

    #[error("Builder session expired, reload the page")]
    SessionExpired,

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

fn validation_summary(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let msg = error.message.as_ref().map_or_else(
                || format!("Field '{}' is invalid", field),
                |m| m.to_string(),
            );
            messages.push(msg);
        }
    }
    messages.sort();
    messages.join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::SqlxError(ref sqlx_error) => {
                tracing::error!("SQLx error: {:?}", sqlx_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error (database)".to_string(),
                )
            }
            AppError::MigrateError(ref e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error (database)".to_string(),
                )
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            AppError::ValidationError(ref errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, validation_summary(errors))
            }
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::SessionExpired => {
                // Fragment endpoints are called by htmx; let the page show a toast.
                let message = AppError::SessionExpired.to_string();
                let headers = show_message_headers(&message, "error");
                return (StatusCode::GONE, headers, Json(json!({ "error": message })))
                    .into_response();
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error (files)".to_string(),
                )
            }
            AppError::Zip(ref e) => {
                tracing::error!("Zip error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not build the archive".to_string(),
                )
            }
            AppError::InternalServerError(message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Multipart processing error: {:?}", err);
        AppError::UnprocessableEntity(format!("Could not read form data: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalServerError(format!("Background task failed: {}", err))
    }
}
