//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All three repositories share one [`InMemoryDatabase`] so that uniqueness and
//! foreign-key rules behave like the SQL schema: posts require an existing
//! author, users with posts cannot be deleted, deleting a post cascades to its
//! comments and deleting a user nulls the author of their comments.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use blog_core::domain::{
    Comment, CommentUpdate, NewComment, NewPost, NewUser, Page, Post, PostUpdate, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Tables {
    /// Username clashes win over email clashes, whichever rows they come from.
    fn check_unique_user(&self, id: Option<i64>, username: &str, email: &str) -> Result<(), RepoError> {
        let mut others = self.users.values().filter(|u| Some(u.id) != id);
        if others.clone().any(|u| u.username == username) {
            return Err(RepoError::UsernameExists);
        }
        if others.any(|u| u.email == email) {
            return Err(RepoError::EmailExists);
        }
        Ok(())
    }
}

/// Shared table storage for the in-memory repositories.
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// Newest first, id breaking ties, then the requested window.
fn paginate<T, F>(mut rows: Vec<T>, page: Option<Page>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (DateTime<Utc>, i64),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    match page {
        Some(page) => rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect(),
        None => rows,
    }
}

pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn init_schema(&self) -> Result<(), RepoError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.db.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.check_unique_user(None, &user.username, &user.email)?;

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_unique_user(Some(user.id), &user.username, &user.email)?;

        let stored = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        stored.username = user.username;
        stored.email = user.email;
        stored.password_hash = user.password_hash;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if tables.posts.values().any(|p| p.author_id == id) {
            return Err(RepoError::ForeignKeyViolation(format!(
                "user {id} is still referenced by posts"
            )));
        }

        tables.users.remove(&id);
        for comment in tables.comments.values_mut() {
            if comment.author_id == Some(id) {
                comment.author_id = None;
            }
        }
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError> {
        let tables = self.db.tables.read().await;
        let rows = tables.users.values().cloned().collect();
        Ok(paginate(rows, Some(page), |u| (u.created_at, u.id)))
    }
}

pub struct InMemoryPostRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryPostRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn init_schema(&self) -> Result<(), RepoError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.db.tables.read().await.posts.get(&id).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::ForeignKeyViolation(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        tables.last_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.last_post_id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, update: PostUpdate) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;
        let stored = tables
            .posts
            .get_mut(&update.id)
            .filter(|p| p.author_id == update.author_id)
            .ok_or(RepoError::NotFound)?;

        stored.title = update.title;
        stored.content = update.content;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        match tables.posts.get(&id) {
            Some(p) if p.author_id == author_id => {}
            _ => return Err(RepoError::NotFound),
        }

        tables.posts.remove(&id);
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        let rows = tables.posts.values().cloned().collect();
        Ok(paginate(rows, Some(page), |p| (p.created_at, p.id)))
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        let rows = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(paginate(rows, None, |p| (p.created_at, p.id)))
    }
}

pub struct InMemoryCommentRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryCommentRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn init_schema(&self) -> Result<(), RepoError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.db.tables.read().await.comments.get(&id).cloned())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::ForeignKeyViolation(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(RepoError::ForeignKeyViolation(format!(
                "author {} does not exist",
                comment.author_id
            )));
        }

        tables.last_comment_id += 1;
        let now = Utc::now();
        let comment = Comment {
            id: tables.last_comment_id,
            content: comment.content,
            post_id: comment.post_id,
            author_id: Some(comment.author_id),
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn author_id(&self, id: i64) -> Result<Option<i64>, RepoError> {
        let tables = self.db.tables.read().await;
        tables
            .comments
            .get(&id)
            .map(|c| c.author_id)
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, update: CommentUpdate) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;
        let stored = tables
            .comments
            .get_mut(&update.id)
            .filter(|c| c.post_id == update.post_id && c.author_id == Some(update.author_id))
            .ok_or(RepoError::NotFound)?;

        stored.content = update.content;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        match tables.comments.get(&id) {
            Some(c) if c.author_id == Some(author_id) => {}
            _ => return Err(RepoError::NotFound),
        }
        tables.comments.remove(&id);
        Ok(())
    }

    async fn list(&self, page: Page, post_id: Option<i64>) -> Result<Vec<Comment>, RepoError> {
        let tables = self.db.tables.read().await;
        let rows = tables
            .comments
            .values()
            .filter(|c| post_id.is_none_or(|pid| c.post_id == pid))
            .cloned()
            .collect();
        Ok(paginate(rows, Some(page), |c| (c.created_at, c.id)))
    }
}
