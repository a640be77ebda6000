//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden: identity {acting} does not own this resource")]
    Forbidden { acting: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
///
/// Adapters translate engine-specific failures into these variants at their
/// boundary; nothing above the repository layer sees a driver error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Row absent, or a filtered update/delete touched zero rows.
    #[error("Entity not found")]
    NotFound,

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Email already exists")]
    EmailExists,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Database operation failed: {0}")]
    OperationFailed(String),
}
