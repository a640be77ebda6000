//! Domain entities - the core business objects.

mod comment;
mod ownership;
mod page;
mod post;
mod user;

pub use comment::{Comment, CommentUpdate, NewComment};
pub use ownership::ensure_owner;
pub use page::Page;
pub use post::{
    NewPost, POST_CACHE_TOMBSTONE, POST_CACHE_TTL, POST_TOMBSTONE_TTL, Post, PostUpdate, PostView,
};
pub use user::{NewUser, User};
