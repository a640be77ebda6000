//! Standardized API response types.
//!
//! Every body carries a numeric `status` equal to the HTTP status code;
//! failures add an `error` message.

use serde::{Deserialize, Serialize};

/// Successful API response: the payload's fields are flattened next to `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self { status, data }
    }

    pub fn ok(data: T) -> Self {
        Self::new(200, data)
    }

    pub fn created(data: T) -> Self {
        Self::new(201, data)
    }
}

/// Error body: `{"status": 404, "error": "Post not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            error: Some(error.into()),
        }
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(401, detail)
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}
