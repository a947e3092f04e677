use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error on field '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("External API error ({service}): {message}")]
    ExternalAPIError { service: String, message: String },

    #[error("Invalid response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid invocation signature")]
    InvalidSignature,

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type VideoResult<T> = Result<T, VideoError>;

impl VideoError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        VideoError::ValidationError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn external(service: &str, message: impl Into<String>) -> Self {
        VideoError::ExternalAPIError {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_response(service: &str, message: impl Into<String>) -> Self {
        VideoError::InvalidResponse {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for VideoError {
    fn into_response(self) -> Response {
        let status = match &self {
            VideoError::NotFound(_) => StatusCode::NOT_FOUND,
            VideoError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            VideoError::InvalidSignature => StatusCode::UNAUTHORIZED,
            VideoError::ExternalAPIError { .. }
            | VideoError::InvalidResponse { .. }
            | VideoError::RequestError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
