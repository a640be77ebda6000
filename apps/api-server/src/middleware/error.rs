//! HTTP error mapping - every failure becomes `{"status": <code>, "error": <message>}`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use validator::ValidationErrors;

use blog_core::error::{DomainError, RepoError};
use blog_core::ports::AuthError;
use blog_shared::ErrorResponse;

/// Application-level error type; the variant decides the status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // Never echoed to the client
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{entity_type} {id} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized("Unauthorized".to_string()),
            DomainError::Forbidden { acting } => {
                tracing::info!(user_id = acting, "Ownership check failed");
                AppError::Forbidden
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::ForeignKeyViolation(msg) => {
                tracing::debug!(detail = %msg, "Foreign key violation");
                AppError::BadRequest("Referenced resource does not exist".to_string())
            }
            RepoError::EmailExists => AppError::Conflict("Email already exists".to_string()),
            RepoError::UsernameExists => AppError::Conflict("Username already exists".to_string()),
            RepoError::UniqueViolation(msg) => {
                tracing::debug!(detail = %msg, "Unique violation");
                AppError::Conflict("Resource already exists".to_string())
            }
            RepoError::OperationFailed(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".to_string()),
            AuthError::InvalidToken(reason) => {
                tracing::debug!(%reason, "Token rejected");
                AppError::Unauthorized("Invalid token".to_string())
            }
            AuthError::MissingAuth => {
                AppError::Unauthorized("Missing authorization header".to_string())
            }
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::HashingError(msg) | AuthError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        AppError::BadRequest(format!("Invalid fields: {}", fields.join(", ")))
    }
}

/// Map a repository error, naming the resource when it is missing.
pub fn repo_error(resource: &'static str) -> impl Fn(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound => AppError::NotFound(format!("{resource} not found")),
        other => other.into(),
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError::BadRequest("Invalid JSON body".to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected path parameter");
    AppError::BadRequest("Invalid id".to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected query string");
    AppError::BadRequest("Invalid query parameters".to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
