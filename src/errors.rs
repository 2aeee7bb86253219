use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

use crate::period::PeriodError;
use crate::remote::RemoteError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    Unauthorized(String),
    /// A required environment key is absent; carries the key name.
    ConfigurationMissing(String),
    RemoteFetchFailed(String),
    InternalError(String),
}

/// Standard error response format
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[schema(example = "EXPENSE_DB_ID is not configured.")]
    pub error: String,
    /// Error type code (e.g., "VALIDATION_ERROR", "CONFIGURATION_MISSING")
    #[schema(example = "CONFIGURATION_MISSING")]
    pub code: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::ConfigurationMissing(key) => write!(f, "{key} is not configured."),
            AppError::RemoteFetchFailed(msg) => write!(f, "Remote fetch failed: {msg}"),
            AppError::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, code, message) = match self {
            AppError::ValidationError(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Unauthorized(msg) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
            ),
            AppError::ConfigurationMissing(key) => {
                error!("Required configuration {key} is missing");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_MISSING",
                    format!("{key} is not configured."),
                )
            }
            AppError::RemoteFetchFailed(msg) => {
                error!("Remote fetch failed: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "REMOTE_FETCH_FAILED",
                    msg.clone(),
                )
            }
            AppError::InternalError(msg) => {
                // Log the actual error for debugging, but don't expose to client
                error!("Internal error: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: message,
            code: code.to_string(),
        })
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::MissingApiKey => {
                AppError::ConfigurationMissing("NOTION_API_KEY".to_string())
            }
            other => AppError::RemoteFetchFailed(other.to_string()),
        }
    }
}
