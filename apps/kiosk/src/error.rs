//! # API Error Type
//!
//! Unified error type for kiosk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Resto                                  │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──► DbError ──► ApiError { code, msg }  │
//! │                                                                         │
//! │  Blank customer name ─────────────────────────► VALIDATION_ERROR       │
//! │  Empty cart ──────────────────────────────────► VALIDATION_ERROR       │
//! │  Duplicate category ─── UniqueViolation ──────► VALIDATION_ERROR       │
//! │  Completed → Pending ── IllegalTransition ────► ILLEGAL_TRANSITION     │
//! │  Order cleared mid-update ── NotFound ────────► NOT_FOUND              │
//! │  SQLite failure ─── QueryFailed / ... ────────► STORAGE_ERROR          │
//! │  Wrong staff PIN ─────────────────────────────► UNAUTHORIZED           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried: every error goes straight back to the caller for
//! display, and the failed operation leaves stored state as it was.

use resto_core::{CoreError, LineHandle, ValidationError};
use resto_db::DbError;
use serde::Serialize;

use crate::state::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 42"
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
    /// The record no longer exists
    NotFound,

    /// Input validation failed
    ValidationError,

    /// The persistence engine failed
    StorageError,

    /// Order status change not allowed from the current status
    IllegalTransition,

    /// Staff command without the staff PIN
    Unauthorized,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::IllegalTransition => "ILLEGAL_TRANSITION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a not found error for a cart line that is no longer in the cart.
    pub fn stale_line(handle: LineHandle) -> Self {
        ApiError::not_found("Cart line", handle)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            DbError::Core(e) => ApiError::from(e),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e @ CoreError::IllegalTransition { .. } => {
                ApiError::new(ErrorCode::IllegalTransition, e.to_string())
            }
            e @ CoreError::UnknownStatus(_) => ApiError::validation(e.to_string()),
            CoreError::Snapshot(e) => {
                tracing::error!("Order snapshot unreadable: {}", e);
                ApiError::internal("Order items could not be read")
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(_) | ConfigError::LoadFailed(_) => {
                ApiError::validation(err.to_string())
            }
            ConfigError::SaveFailed(_) | ConfigError::NoConfigDir => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for command results.
pub type ApiResult<T> = Result<T, ApiError>;
