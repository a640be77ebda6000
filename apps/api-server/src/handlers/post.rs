//! Post handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use validator::Validate;

use blog_core::domain::{
    NewPost, POST_CACHE_TOMBSTONE, POST_CACHE_TTL, POST_TOMBSTONE_TTL, Page, PostUpdate, PostView,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, Cache};
use blog_shared::ApiResponse;
use blog_shared::dto::{
    ListQuery, ListResponse, PostCreated, PostDeleted, PostRequest, PostSummary, PostUpdated,
};

use super::resolve_usernames;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, repo_error};
use crate::state::AppState;

/// POST /post
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post = state
        .posts
        .create(NewPost {
            title: req.title,
            content: req.content,
            author_id: identity.user_id,
        })
        .await
        .map_err(|e| match e {
            RepoError::ForeignKeyViolation(_) => {
                AppError::BadRequest("author does not exist".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::created(PostCreated { post_id: post.id })))
}

/// GET /post/{id}
pub async fn read(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let key = PostView::cache_key(id);

    // A recent write leaves a tombstone; skip the fill so it stays in place.
    let mut fill = true;
    if let Some(cache) = &state.cache {
        match cache.get(&key).await {
            Ok(Some(raw)) if PostView::is_tombstone(&raw) => {
                tracing::debug!(post_id = id, "Post recently written, bypassing cache");
                fill = false;
            }
            Ok(Some(raw)) => match serde_json::from_str::<PostView>(&raw) {
                Ok(view) => {
                    tracing::debug!(post_id = id, "Post served from cache");
                    return Ok(HttpResponse::Ok().json(ApiResponse::ok(view)));
                }
                Err(e) => {
                    tracing::warn!(post_id = id, error = %e, "Dropping undecodable cache entry");
                    if let Err(e) = cache.delete(&key).await {
                        tracing::warn!(post_id = id, error = %e, "Failed to drop cache entry");
                    }
                }
            },
            Ok(None) => tracing::debug!(post_id = id, "Post cache miss"),
            Err(e) => tracing::warn!(post_id = id, error = %e, "Post cache lookup failed"),
        }
    }

    let post = state.posts.get(id).await.map_err(repo_error("Post"))?;

    // An unresolvable author leaves the username empty
    let username = match state.users.find_by_id(post.author_id).await {
        Ok(Some(user)) => user.username,
        Ok(None) => String::new(),
        Err(e) => {
            tracing::warn!(post_id = id, author_id = post.author_id, error = %e, "Author lookup failed");
            String::new()
        }
    };

    let view = PostView::new(post, username);
    if let Some(cache) = state.cache.as_ref().filter(|_| fill) {
        spawn_cache_fill(cache.clone(), key, &view);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
}

/// PATCH /post/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let post = state.posts.get(id).await.map_err(repo_error("Post"))?;
    identity.ensure_owner(Some(post.author_id))?;

    let updated = state
        .posts
        .update(PostUpdate {
            id,
            author_id: identity.user_id,
            title: req.title,
            content: req.content,
        })
        .await
        .map_err(repo_error("Post"))?;

    invalidate(state.cache.as_ref(), id).await;
    tracing::info!(post_id = id, author_id = identity.user_id, "Post updated");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostUpdated {
        post_id: updated.id,
        title: updated.title,
        content: updated.content,
        author_id: updated.author_id,
        updated_at: updated.updated_at,
    })))
}

/// DELETE /post/{id}
pub async fn delete(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state.posts.get(id).await.map_err(repo_error("Post"))?;
    identity.ensure_owner(Some(post.author_id))?;

    state
        .posts
        .delete(id, identity.user_id)
        .await
        .map_err(repo_error("Post"))?;

    invalidate(state.cache.as_ref(), id).await;
    tracing::info!(post_id = id, author_id = identity.user_id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDeleted { post_id: id })))
}

/// GET /posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = Page::new(query.limit, query.offset)?;

    let posts = state.posts.list(page).await?;
    let usernames =
        resolve_usernames(state.users.as_ref(), posts.iter().map(|p| p.author_id)).await;

    let data: Vec<PostSummary> = posts
        .into_iter()
        .filter_map(|p| {
            let Some(username) = usernames.get(&p.author_id) else {
                tracing::warn!(post_id = p.id, author_id = p.author_id, "Skipping post without author");
                return None;
            };
            Some(PostSummary {
                post_id: p.id,
                title: p.title,
                content: p.content,
                author_id: p.author_id,
                username: username.clone(),
                created_at: p.created_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ListResponse { data })))
}

/// Populate the cache off the request path. The outcome is only logged.
///
/// The write is set-if-absent: a fill that loaded the row before a
/// concurrent update or delete finds the tombstone and is dropped.
fn spawn_cache_fill(cache: Arc<dyn Cache>, key: String, view: &PostView) {
    let payload = match serde_json::to_string(view) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(cache_key = %key, error = %e, "Failed to encode post for cache");
            return;
        }
    };

    tokio::spawn(async move {
        match cache.set_if_absent(&key, &payload, Some(POST_CACHE_TTL)).await {
            Ok(true) => tracing::debug!(cache_key = %key, "Post cached"),
            Ok(false) => tracing::debug!(cache_key = %key, "Cache entry present, fill dropped"),
            Err(e) => tracing::warn!(cache_key = %key, error = %e, "Failed to cache post"),
        }
    });
}

/// Replace the cached projection with a short-lived tombstone.
async fn invalidate(cache: Option<&Arc<dyn Cache>>, id: i64) {
    let Some(cache) = cache else { return };
    let key = PostView::cache_key(id);
    if let Err(e) = cache
        .set(&key, POST_CACHE_TOMBSTONE, Some(POST_TOMBSTONE_TTL))
        .await
    {
        tracing::warn!(post_id = id, error = %e, "Failed to invalidate cached post");
    }
}
