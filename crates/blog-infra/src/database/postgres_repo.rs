//! SeaORM repository implementations (PostgreSQL, or SQLite with the `sqlite` feature).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};

use blog_core::domain::{
    Comment, CommentUpdate, NewComment, NewPost, NewUser, Page, Post, PostUpdate, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::error::map_db_err;
use super::postgres_base::PostgresBaseRepository;
use crate::redact::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let ts = now();
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            created_at: Set(ts),
            updated_at: Set(ts),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Username, Expr::value(user.username))
            .col_expr(user::Column::Email, Expr::value(user.email))
            .col_expr(user::Column::PasswordHash, Expr::value(user.password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(now()))
            .filter(user::Column::Id.eq(user.id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        UserEntity::find_by_id(user.id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError> {
        let rows = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let ts = now();
        let model = post::ActiveModel {
            id: NotSet,
            title: Set(post.title),
            content: Set(post.content),
            author_id: Set(post.author_id),
            created_at: Set(ts),
            updated_at: Set(ts),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, update: PostUpdate) -> Result<Post, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(update.title))
            .col_expr(post::Column::Content, Expr::value(update.content))
            .col_expr(post::Column::UpdatedAt, Expr::value(now()))
            .filter(post::Column::Id.eq(update.id))
            .filter(post::Column::AuthorId.eq(update.author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        PostEntity::find_by_id(update.id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let ts = now();
        let model = comment::ActiveModel {
            id: NotSet,
            content: Set(comment.content),
            post_id: Set(comment.post_id),
            author_id: Set(Some(comment.author_id)),
            created_at: Set(ts),
            updated_at: Set(ts),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn author_id(&self, id: i64) -> Result<Option<i64>, RepoError> {
        // Outer None: no such row. Inner None: the author was deleted.
        CommentEntity::find_by_id(id)
            .select_only()
            .column(comment::Column::AuthorId)
            .into_tuple::<Option<i64>>()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, update: CommentUpdate) -> Result<Comment, RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Content, Expr::value(update.content))
            .col_expr(comment::Column::UpdatedAt, Expr::value(now()))
            .filter(comment::Column::Id.eq(update.id))
            .filter(comment::Column::PostId.eq(update.post_id))
            .filter(comment::Column::AuthorId.eq(update.author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        CommentEntity::find_by_id(update.id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64, author_id: i64) -> Result<(), RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, page: Page, post_id: Option<i64>) -> Result<Vec<Comment>, RepoError> {
        let mut query = CommentEntity::find();
        if let Some(post_id) = post_id {
            query = query.filter(comment::Column::PostId.eq(post_id));
        }

        let rows = query
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
