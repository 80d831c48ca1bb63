//! # Database Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where DbError comes from                             │
//! │                                                                         │
//! │  sqlx::Error ──────────┐                                                │
//! │  MigrateError ─────────┼──► DbError ──► ApiError (kiosk, code + text)   │
//! │  CoreError ────────────┤     (Core)                                     │
//! │  ValidationError ──────┘                                                │
//! │                                                                         │
//! │  Missing rows are reported by the repositories themselves with the      │
//! │  entity name and id; sqlx's own RowNotFound carries neither.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use resto_core::{CoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id, e.g. a status change after the order was cleared.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE column already holds the value (category names).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The file could not be opened or created, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A rule rejected the write: validation or an illegal status change.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `true` for engine failures, `false` for missing rows, duplicates and
    /// rule violations.
    pub fn is_storage(&self) -> bool {
        !matches!(
            self,
            DbError::NotFound { .. } | DbError::UniqueViolation { .. } | DbError::Core(_)
        )
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        CoreError::Validation(err).into()
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                // SQLite: "UNIQUE constraint failed: categories.name"
                let field = db_err
                    .message()
                    .rsplit(": ")
                    .next()
                    .unwrap_or("unknown")
                    .to_string();
                DbError::duplicate(field, "unknown")
            }
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
