use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Execution not found: {0}")]
    ExecutionNotFound(i64),

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Function already exists: {0}")]
    FunctionAlreadyExists(String),

    #[error("No {mode} run found for execution {id}")]
    DerivedNotFound { id: i64, mode: &'static str },

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Json(e) => {
                tracing::error!("Stored payload is not valid JSON: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::ExecutionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Execution '{}' not found", id))
            }
            AppError::FunctionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Function '{}' not found", id))
            }
            AppError::FunctionAlreadyExists(name) => (
                StatusCode::CONFLICT,
                format!("Function '{}' already exists", name),
            ),
            AppError::DerivedNotFound { id, mode } => (
                StatusCode::NOT_FOUND,
                format!("No {} run found for execution '{}'", mode, id),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
