use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long a hydrated post projection stays in the cache.
pub const POST_CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Marker left under a post's cache key after a write. Fills are
/// set-if-absent, so a fill started before the write cannot land while the
/// marker is live.
pub const POST_CACHE_TOMBSTONE: &str = "__invalidated__";

/// Lifetime of [`POST_CACHE_TOMBSTONE`]. Must outlast any in-flight fill.
pub const POST_TOMBSTONE_TTL: Duration = Duration::from_secs(30);

/// Post entity - represents a blog post.
///
/// `author_id` is fixed at creation; no update path rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// An update scoped to its author: the store only touches the row when both
/// `id` and `author_id` match.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
}

/// Denormalized read projection of a post joined with its author's username.
///
/// This is the shape stored in the cache under [`PostView::cache_key`], so a
/// cache hit needs no secondary lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// Build the projection. An empty username means the author could not be resolved.
    pub fn new(post: Post, username: impl Into<String>) -> Self {
        Self {
            post_id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            username: username.into(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    /// Cache key for a post projection.
    pub fn cache_key(post_id: i64) -> String {
        format!("post:{post_id}")
    }

    /// Whether a raw cache value is the post-write marker rather than a projection.
    pub fn is_tombstone(raw: &str) -> bool {
        raw == POST_CACHE_TOMBSTONE
    }
}
