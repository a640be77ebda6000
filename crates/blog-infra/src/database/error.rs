//! Translation of driver errors into the repository error taxonomy.

use sea_orm::{DbErr, SqlErr};

use blog_core::error::RepoError;

/// Map a SeaORM error onto [`RepoError`].
///
/// Constraint violations are recognised from the driver's structured error;
/// anything else is logged here and surfaced as an opaque failure.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::ForeignKeyViolation(msg),
        Some(SqlErr::UniqueConstraintViolation(msg)) => classify_unique(msg),
        _ => match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            other => {
                tracing::error!(error = %other, "Database operation failed");
                RepoError::OperationFailed(other.to_string())
            }
        },
    }
}

/// Postgres names the violated constraint (`users_email_key`), SQLite the
/// column (`users.email`); either way the column name appears in the message.
pub(crate) fn classify_unique(msg: String) -> RepoError {
    if msg.contains("username") {
        RepoError::UsernameExists
    } else if msg.contains("email") {
        RepoError::EmailExists
    } else {
        RepoError::UniqueViolation(msg)
    }
}
