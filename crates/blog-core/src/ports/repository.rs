use async_trait::async_trait;

use crate::domain::{
    Comment, CommentUpdate, NewComment, NewPost, NewUser, Page, Post, PostUpdate, User,
};
use crate::error::RepoError;

/// Operations shared by every resource repository.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync
where
    T: Send + 'static,
    ID: Send + 'static,
{
    /// Create the backing table if it does not exist yet. Idempotent.
    async fn init_schema(&self) -> Result<(), RepoError>;

    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Like [`BaseRepository::find_by_id`], with absence reported as [`RepoError::NotFound`].
    async fn get(&self, id: ID) -> Result<T, RepoError> {
        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Insert a user. Duplicate email or username surface as
    /// [`RepoError::EmailExists`] / [`RepoError::UsernameExists`].
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Overwrite username, email and password hash of an existing user.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    /// Users, newest first.
    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a post. A missing author surfaces as [`RepoError::ForeignKeyViolation`].
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Update title and content where both id and author match.
    /// Zero matching rows is [`RepoError::NotFound`].
    async fn update(&self, update: PostUpdate) -> Result<Post, RepoError>;

    /// Delete where both id and author match.
    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError>;

    /// Posts, newest first.
    async fn list(&self, page: Page) -> Result<Vec<Post>, RepoError>;

    /// Every post by one author, newest first.
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Insert a comment. A missing post or author surfaces as
    /// [`RepoError::ForeignKeyViolation`].
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Narrow lookup used for ownership checks. The outer error is
    /// [`RepoError::NotFound`] when the comment is absent; the inner `None`
    /// means the author identity was deleted.
    async fn author_id(&self, id: i64) -> Result<Option<i64>, RepoError>;

    /// Update content where id, post and author all match.
    async fn update(&self, update: CommentUpdate) -> Result<Comment, RepoError>;

    /// Delete where both id and author match.
    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError>;

    /// Comments, newest first, optionally restricted to one post.
    async fn list(&self, page: Page, post_id: Option<i64>) -> Result<Vec<Comment>, RepoError>;
}
