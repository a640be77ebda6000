//! HTTP handlers and route configuration.

mod comment;
mod post;
mod user;

use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpResponse, web};
use futures::future::join_all;

use blog_core::ports::{BaseRepository, UserRepository};

use crate::middleware::error::{
    AppError, json_error_handler, path_error_handler, query_error_handler,
};

/// Configure all application routes and extractor error handling.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // Posts
        .route("/post", web::post().to(post::create))
        .service(
            web::resource("/post/{id}")
                .route(web::get().to(post::read))
                .route(web::patch().to(post::update))
                .route(web::delete().to(post::delete)),
        )
        .route("/posts", web::get().to(post::list))
        // Comments
        .route("/comment", web::post().to(comment::create))
        .service(
            web::resource("/comment/{id}")
                .route(web::patch().to(comment::update))
                .route(web::delete().to(comment::delete)),
        )
        .route("/comments", web::get().to(comment::list))
        // Users
        .service(
            web::scope("/user")
                .route("/signup", web::post().to(user::sign_up))
                .route("/signin", web::post().to(user::sign_in)),
        )
        .default_service(web::to(not_found));
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route not found".to_string()))
}

/// Look up the username of every distinct author concurrently.
///
/// Authors that are missing, or whose lookup failed, are absent from the map;
/// list handlers drop their rows.
async fn resolve_usernames<I>(users: &dyn UserRepository, author_ids: I) -> HashMap<i64, String>
where
    I: IntoIterator<Item = i64>,
{
    let distinct: BTreeSet<i64> = author_ids.into_iter().collect();
    let lookups = distinct
        .into_iter()
        .map(|id| async move { (id, users.find_by_id(id).await) });

    join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(Some(user)) => Some((id, user.username)),
            Ok(None) => {
                tracing::warn!(author_id = id, "Author not found");
                None
            }
            Err(e) => {
                tracing::warn!(author_id = id, error = %e, "Author lookup failed");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
