//! Authentication extractor.

use std::future::{Ready, ready};

use actix_web::http::header::{self, HeaderValue};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use blog_core::domain::ensure_owner;
use blog_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header.
///
/// Taking it as a handler parameter makes the route require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
}

impl Identity {
    /// Fail with 403 unless this identity is `owner`.
    pub fn ensure_owner(&self, owner: Option<i64>) -> Result<(), AppError> {
        ensure_owner(self.user_id, owner).map_err(AppError::from)
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("application state missing".to_string())
    })?;

    let token = bearer_token(req.headers().get(header::AUTHORIZATION))?;
    let claims = state.tokens.validate_token(token)?;

    Ok(Identity {
        user_id: claims.user_id,
    })
}

/// Split `<scheme> <token>`. Exactly two non-empty parts; the scheme is not checked.
fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, AppError> {
    let value = value.ok_or(AuthError::MissingAuth)?;
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        [scheme, token] if !scheme.is_empty() && !token.is_empty() => Ok(*token),
        _ => Err(AppError::Unauthorized(
            "Malformed authorization header".to_string(),
        )),
    }
}
