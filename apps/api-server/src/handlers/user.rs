//! Sign-up and sign-in handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blog_core::domain::NewUser;
use blog_infra::mask_email;
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthResponse, SignInRequest, SignUpRequest, SignUpResponse, UserId};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /user/signup
pub async fn sign_up(
    state: web::Data<AppState>,
    body: web::Json<SignUpRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let masked = mask_email(&req.email);
    let password_hash = state.passwords.hash(&req.password)?;

    let user = state
        .users
        .create(NewUser::new(req.username, req.email, password_hash))
        .await
        .inspect_err(|e| tracing::info!(user_email = %masked, error = %e, "Sign-up rejected"))?;

    tracing::info!(user_id = user.id, user_email = %masked, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::created(SignUpResponse {
        user: UserId { user_id: user.id },
    })))
}

/// POST /user/signin
pub async fn sign_in(
    state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| {
            tracing::info!(user_email = %mask_email(&req.email), "Sign-in for unknown email");
            AppError::NotFound("User not found".to_string())
        })?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Sign-in with wrong password");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.tokens.generate_token(user.id)?;
    tracing::info!(user_id = user.id, "User signed in");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthResponse {
        auth_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })))
}
