//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bakehouse                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │       │                                                                 │
//! │       ├── ValidationError ──► CoreError ──┐                             │
//! │       │                                   │                             │
//! │       ├── sqlx::Error ──► DbError ────────┼──► ApiError                 │
//! │       │                                   │       │                     │
//! │       └── bad token / bad JSON ───────────┘       │                     │
//! │                                                   ▼                     │
//! │                              HTTP status + {"code": .., "message": ..}  │
//! │                                                                         │
//! │  Database internals are logged here and replaced by a generic message.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bakehouse_core::{CoreError, ValidationError};
use bakehouse_db::DbError;

/// Error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Bill not found: 5f0c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// No bearer token (401)
    Unauthorized,

    /// Bad or expired token (403)
    Forbidden,

    /// Request clashes with one already in progress (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Request carried no token.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Access token required")
    }

    /// Token present but not acceptable.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Not-found and duplicate errors pass through; everything else is logged
/// and replaced by a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::UniqueViolation { field, value } => {
                return ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { .. } => {
                tracing::error!(error = %err, "Rejected write");
                return ApiError::validation("Invalid reference");
            }
            DbError::ConnectionFailed(_) => "Database connection failed",
            DbError::PoolExhausted => "Database busy, try again",
            DbError::TransactionFailed(_) => "Database transaction failed",
            DbError::MigrationFailed(_) | DbError::QueryFailed(_) | DbError::Internal(_) => {
                "Database operation failed"
            }
        };

        tracing::error!(error = %err, "Database error");
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IngredientNotFound(id) => ApiError::not_found("Ingredient", &id),
            CoreError::AdditionalCostNotFound(id) => ApiError::not_found("Additional cost", &id),
            CoreError::EmptyBill => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
