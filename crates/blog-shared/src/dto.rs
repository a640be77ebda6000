//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    /// 5-30 ASCII letters or digits.
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    /// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Request to sign in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserId {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user: UserId,
}

/// Response containing an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub auth_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(5..=30).contains(&len) {
        return Err(ValidationError::new("username_length"));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new("username_charset"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(ValidationError::new("password_length"));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(ValidationError::new("password_strength"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Body of `POST /post` and `PATCH /post/{id}`. There is no author field:
/// the author is always the authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(length(min = 3, max = 255))]
    pub title: String,
    #[validate(length(min = 10))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreated {
    pub post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdated {
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeleted {
    pub post_id: i64,
}

/// One row of `GET /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Body of `POST /comment` and `PATCH /comment/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 10, max = 1024))]
    pub content: String,
    #[validate(range(min = 1))]
    pub post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreated {
    pub comment_id: i64,
    pub post_id: i64,
    pub author_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUpdated {
    pub comment_id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeleted {
    pub comment_id: i64,
}

/// One row of `GET /comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSummary {
    pub comment_id: i64,
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query string of `GET /comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub post_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}
