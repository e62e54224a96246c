//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::issuer::IssueError;
use crate::signing::SigningError;

/// API error response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, code: &str, msg: &str, retry: bool) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody {
                    code: code.to_owned(),
                    message: msg.to_owned(),
                },
            },
        }
    }

    /// Create a 400 validation error carrying a field-level error code
    #[must_use]
    pub fn validation(code: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            code,
            "Request validation failed",
            false,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert issuance errors to application errors
///
/// Validation failures map to 400; gateway failures map to 5xx. An issuance
/// failure must never surface as a 200.
impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        match &err {
            IssueError::InvalidName(e) => {
                tracing::warn!("Invalid name: {e}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_name",
                    "Bucket or key name violates naming policy",
                    false,
                )
            }
            IssueError::InvalidTtl(ttl) | IssueError::Signing(SigningError::InvalidTtl(ttl)) => {
                tracing::warn!("Invalid ttl: {ttl}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_ttl",
                    "TTL must be between 1 and 604800 seconds",
                    false,
                )
            }
            IssueError::Signing(SigningError::Config(msg)) => {
                tracing::error!("Presigning configuration error: {msg}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    false,
                )
            }
            IssueError::Signing(SigningError::Provider(msg)) => {
                tracing::error!("Provider signing failure: {msg}");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "upstream_error",
                    "Storage provider temporarily unavailable",
                    true,
                )
            }
        }
    }
}
