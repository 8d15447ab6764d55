//! Error type system for the inventory service
//!
//! This module provides:
//! - One error enum shared by services, repositories and handlers
//! - HTTP status code mapping
//! - JSON error bodies with trace IDs
//! - Redaction of internal failures before they reach the caller

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message returned to callers for every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

tokio::task_local! {
    /// Trace id of the request currently being served
    pub static REQUEST_TRACE_ID: String;
}

/// Trace id of the current request, or a fresh one outside a request scope
pub fn current_trace_id() -> String {
    REQUEST_TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| Uuid::new_v4().to_string())
}

/// Main error type for the inventory service
///
/// Client-facing variants display their message verbatim, so the `message`
/// field of the response body is exactly what the handler wrote.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    // Storage errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    // Request errors
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    DuplicateUsername(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    AuthenticationError(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    // Crypto errors
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    // Runtime errors
    #[error("Task error: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl InventoryError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            InventoryError::ValidationError(_) | InventoryError::DuplicateUsername(_) => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized
            InventoryError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            InventoryError::PermissionDenied(_) => StatusCode::FORBIDDEN,

            // 404 Not Found
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            InventoryError::Conflict(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            InventoryError::DatabaseError(_)
            | InventoryError::PoolError(_)
            | InventoryError::HashingError(_)
            | InventoryError::TokenError(_)
            | InventoryError::TaskError(_)
            | InventoryError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            InventoryError::DatabaseError(_) | InventoryError::PoolError(_) => "DatabaseError",
            InventoryError::ValidationError(_) => "ValidationError",
            InventoryError::DuplicateUsername(_) | InventoryError::Conflict(_) => "ConflictError",
            InventoryError::AuthenticationError(_) => "AuthenticationError",
            InventoryError::PermissionDenied(_) => "AuthorizationError",
            InventoryError::NotFound(_) => "NotFoundError",
            InventoryError::HashingError(_)
            | InventoryError::TokenError(_)
            | InventoryError::TaskError(_)
            | InventoryError::IoError(_) => "InternalError",
        }
    }

    /// Whether the underlying cause must stay in the server logs
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to hand to the caller
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// True when a SQLite UNIQUE constraint rejected the write
    pub fn is_unique_violation(&self) -> bool {
        match self {
            InventoryError::DatabaseError(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

impl From<JsonRejection> for InventoryError {
    fn from(rejection: JsonRejection) -> Self {
        InventoryError::ValidationError(format!(
            "Error de validación: cuerpo JSON inválido ({}).",
            rejection.body_text()
        ))
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response tagged with the current trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: current_trace_id(),
        }
    }

    /// Create an error response from an InventoryError
    pub fn from_error(error: &InventoryError) -> Self {
        Self::new(error.error_type().to_string(), error.public_message())
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        if self.is_internal() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with InventoryError
pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            InventoryError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InventoryError::DuplicateUsername("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InventoryError::AuthenticationError("test".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            InventoryError::PermissionDenied("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            InventoryError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InventoryError::Conflict("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            InventoryError::DatabaseError(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_are_verbatim() {
        let err = InventoryError::AuthenticationError("Usuario o contraseña incorrectos.".into());
        assert_eq!(err.public_message(), "Usuario o contraseña incorrectos.");
    }

    #[test]
    fn test_internal_messages_are_redacted() {
        let err = InventoryError::HashingError("bcrypt exploded".into());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.error, "InternalError");
        assert!(!response.message.contains("bcrypt"));
    }

    #[tokio::test]
    async fn test_error_response_uses_request_trace_id() {
        let response = REQUEST_TRACE_ID
            .scope("trace-123".to_string(), async {
                ErrorResponse::from_error(&InventoryError::NotFound("x".into()))
            })
            .await;
        assert_eq!(response.trace_id, "trace-123");
    }

    #[test]
    fn test_unique_violation_detection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: InventoryError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();

        assert!(err.is_unique_violation());
        assert!(!InventoryError::NotFound("x".into()).is_unique_violation());
    }
}
