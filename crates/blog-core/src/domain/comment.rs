use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a reply attached to a post.
///
/// `author_id` becomes `None` when the authoring identity is deleted; the
/// comment itself survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub post_id: i64,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
}

/// Update filtered by `id`, `post_id` and `author_id` at the store.
#[derive(Debug, Clone)]
pub struct CommentUpdate {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
}
