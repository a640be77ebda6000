//! Offset pagination.

use crate::error::DomainError;

/// A validated `LIMIT`/`OFFSET` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Build a page from optional query parameters.
    ///
    /// `limit` defaults to 10 and must be at least 1 (values above
    /// [`Page::MAX_LIMIT`] are clamped); `offset` defaults to 0 and must not be
    /// negative.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, DomainError> {
        let limit = match limit {
            None => Self::DEFAULT_LIMIT,
            Some(l) if l < 1 => {
                return Err(DomainError::Validation(
                    "Invalid limit parameter".to_string(),
                ));
            }
            Some(l) => (l as u64).min(Self::MAX_LIMIT),
        };

        let offset = match offset {
            None => 0,
            Some(o) if o < 0 => {
                return Err(DomainError::Validation(
                    "Invalid offset parameter".to_string(),
                ));
            }
            Some(o) => o as u64,
        };

        Ok(Self { limit, offset })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
