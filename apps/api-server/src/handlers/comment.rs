//! Comment handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blog_core::domain::{CommentUpdate, NewComment, Page};
use blog_core::error::RepoError;
use blog_shared::ApiResponse;
use blog_shared::dto::{
    CommentCreated, CommentDeleted, CommentListQuery, CommentRequest, CommentSummary,
    CommentUpdated, ListResponse,
};

use super::resolve_usernames;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, repo_error};
use crate::state::AppState;

/// POST /comment
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let comment = state
        .comments
        .create(NewComment {
            content: req.content,
            post_id: req.post_id,
            author_id: identity.user_id,
        })
        .await
        .map_err(|e| match e {
            RepoError::ForeignKeyViolation(_) => {
                AppError::BadRequest("author or post does not exist".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(
        comment_id = comment.id,
        post_id = comment.post_id,
        author_id = identity.user_id,
        "Comment created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::created(CommentCreated {
        comment_id: comment.id,
        post_id: comment.post_id,
        author_id: identity.user_id,
    })))
}

/// PATCH /comment/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let owner = state
        .comments
        .author_id(id)
        .await
        .map_err(repo_error("Comment"))?;
    identity.ensure_owner(owner)?;

    // Also filtered by post: a comment addressed under the wrong post is not found
    let updated = state
        .comments
        .update(CommentUpdate {
            id,
            post_id: req.post_id,
            author_id: identity.user_id,
            content: req.content,
        })
        .await
        .map_err(repo_error("Comment"))?;

    tracing::info!(comment_id = id, author_id = identity.user_id, "Comment updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentUpdated {
        comment_id: updated.id,
        post_id: updated.post_id,
        author_id: identity.user_id,
        content: updated.content,
        updated_at: updated.updated_at,
    })))
}

/// DELETE /comment/{id}
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let owner = state
        .comments
        .author_id(id)
        .await
        .map_err(repo_error("Comment"))?;
    identity.ensure_owner(owner)?;

    state
        .comments
        .delete(id, identity.user_id)
        .await
        .map_err(repo_error("Comment"))?;

    tracing::info!(comment_id = id, author_id = identity.user_id, "Comment deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CommentDeleted { comment_id: id })))
}

/// GET /comments
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CommentListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = Page::new(query.limit, query.offset)?;
    if query.post_id.is_some_and(|id| id < 1) {
        return Err(AppError::BadRequest("Invalid post_id parameter".to_string()));
    }

    let comments = state.comments.list(page, query.post_id).await?;
    let usernames = resolve_usernames(
        state.users.as_ref(),
        comments.iter().filter_map(|c| c.author_id),
    )
    .await;

    let data: Vec<CommentSummary> = comments
        .into_iter()
        .filter_map(|c| {
            let author = c.author_id.and_then(|id| usernames.get(&id).map(|name| (id, name)));
            let Some((author_id, username)) = author else {
                tracing::warn!(comment_id = c.id, author_id = ?c.author_id, "Skipping comment without author");
                return None;
            };
            Some(CommentSummary {
                comment_id: c.id,
                content: c.content,
                post_id: c.post_id,
                author_id,
                username: username.clone(),
                created_at: c.created_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ListResponse { data })))
}
