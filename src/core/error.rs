//! Typed error handling for the storefront API
//!
//! Every failure that can cross the HTTP boundary is a variant of
//! [`ApiError`], so handlers return precise status codes and stable
//! error codes instead of generic `anyhow::Error` values.
//!
//! # Error categories
//!
//! - `NotFound`: entity lookup miss (404)
//! - `Conflict`: uniqueness violation such as a duplicate email (409)
//! - `InvalidCredentials`: failed password check (401)
//! - `LockedOut`: login lockout active, carries the remaining minutes (403)
//! - `Validation`: malformed input, including `page_size = 0` (400)
//! - `OperationFailed`: storage write failure folded into a uniform message (500)
//! - `Storage` / `Internal`: unexpected failures, surfaced opaquely (500)

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the storefront API
#[derive(Debug)]
pub enum ApiError {
    /// Entity was not found
    NotFound {
        resource: &'static str,
        id: String,
    },

    /// Uniqueness violation on an identifying field
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// Email/password pair did not check out
    InvalidCredentials,

    /// Login lockout threshold active
    LockedOut {
        remaining_minutes: i64,
    },

    /// Input validation errors
    Validation(ValidationError),

    /// A storage write failed during a CRUD operation
    OperationFailed {
        resource: &'static str,
        operation: &'static str,
    },

    /// Storage backend errors
    Storage {
        message: String,
    },

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError {
        field: String,
        message: String,
    },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
            ApiError::Conflict {
                resource,
                field,
                value,
            } => {
                write!(f, "{} with {} '{}' already exists", resource, field, value)
            }
            ApiError::InvalidCredentials => write!(f, "Wrong email or password"),
            ApiError::LockedOut { remaining_minutes } => {
                write!(
                    f,
                    "Too many failed login attempts, try again in {} minute(s)",
                    remaining_minutes
                )
            }
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::OperationFailed {
                resource,
                operation,
            } => {
                write!(f, "Failed to {} {}", operation, resource)
            }
            ApiError::Storage { message } => write!(f, "Storage error: {}", message),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
        }
    }
}

impl std::error::Error for ApiError {}
impl std::error::Error for ValidationError {}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Shorthand for the uniform "failed to X" storage-write signal.
    pub fn operation_failed(operation: &'static str, resource: &'static str) -> Self {
        ApiError::OperationFailed {
            resource,
            operation,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::LockedOut { .. } => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::LockedOut { .. } => "LOCKED_OUT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::OperationFailed { .. } => "OPERATION_FAILED",
            ApiError::Storage { .. } => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage and internal errors are reported opaquely; their detail
    /// stays in the logs, never in the response body.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ApiError::Storage { .. } | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            ApiError::Conflict {
                resource,
                field,
                value,
            } => Some(serde_json::json!({
                "resource": resource,
                "field": field,
                "value": value,
            })),
            ApiError::LockedOut { remaining_minutes } => Some(serde_json::json!({
                "remaining_minutes": remaining_minutes,
            })),
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                fields.push(FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                });
            }
        }
        ApiError::Validation(ValidationError::FieldErrors(fields))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for storefront operations
pub type ApiResult<T> = Result<T, ApiError>;
