//! The ownership rule for mutating posts and comments.

use crate::error::DomainError;

/// Check that `acting` is the recorded author of a resource.
///
/// Called after the resource has been loaded and before any mutating
/// statement is issued. An absent owner (the author identity was deleted)
/// belongs to nobody.
pub fn ensure_owner(acting: i64, owner: Option<i64>) -> Result<(), DomainError> {
    match owner {
        Some(owner) if owner == acting => Ok(()),
        _ => Err(DomainError::Forbidden { acting }),
    }
}
