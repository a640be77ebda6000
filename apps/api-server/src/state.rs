//! Application state - the explicitly wired dependencies shared by all handlers.

use std::sync::Arc;

use thiserror::Error;

use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, Cache, CommentRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use blog_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryCommentRepository, InMemoryDatabase,
    InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state. Cloning is cheap; every field is a shared handle.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// `None` when caching is disabled.
    pub cache: Option<Arc<dyn Cache>>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(String),

    #[error("schema initialization failed: {0}")]
    Schema(#[from] RepoError),
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Connect storage and cache according to `config` and initialize the schema.
    pub async fn init(config: &AppConfig) -> Result<Self, StartupError> {
        let repos = match &config.database {
            Some(settings) => connect_database(settings).await?,
            None => {
                tracing::warn!("DATABASE_URL not set. Running with in-memory repositories.");
                in_memory_repositories()
            }
        };

        // Parents first: posts reference users, comments reference both.
        repos.users.init_schema().await?;
        repos.posts.init_schema().await?;
        repos.comments.init_schema().await?;

        let cache = connect_cache(config).await;

        tracing::info!(cache_enabled = cache.is_some(), "Application state initialized");

        Ok(Self {
            users: repos.users,
            posts: repos.posts,
            comments: repos.comments,
            cache,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        })
    }
}

fn in_memory_repositories() -> Repositories {
    let db = InMemoryDatabase::new();
    Repositories {
        users: Arc::new(InMemoryUserRepository::new(db.clone())),
        posts: Arc::new(InMemoryPostRepository::new(db.clone())),
        comments: Arc::new(InMemoryCommentRepository::new(db)),
    }
}

#[cfg(any(feature = "postgres", feature = "sqlite"))]
async fn connect_database(
    settings: &crate::config::DatabaseSettings,
) -> Result<Repositories, StartupError> {
    use blog_infra::{
        DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
        PostgresUserRepository,
    };

    let config = DatabaseConfig {
        url: settings.url.clone(),
        max_connections: settings.max_connections,
        min_connections: settings.min_connections,
    };
    let connections = DatabaseConnections::init(&config)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    let conn = Arc::new(connections.main);
    Ok(Repositories {
        users: Arc::new(PostgresUserRepository::new(conn.clone())),
        posts: Arc::new(PostgresPostRepository::new(conn.clone())),
        comments: Arc::new(PostgresCommentRepository::new(conn)),
    })
}

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
async fn connect_database(
    _settings: &crate::config::DatabaseSettings,
) -> Result<Repositories, StartupError> {
    Err(StartupError::Database(
        "DATABASE_URL is set but the server was built without database support".to_string(),
    ))
}

#[cfg(feature = "redis")]
async fn connect_cache(config: &AppConfig) -> Option<Arc<dyn Cache>> {
    use blog_infra::{RedisCache, RedisConfig};

    let Some(settings) = &config.redis else {
        tracing::info!("REDIS_URL not set. Using in-memory cache.");
        return Some(Arc::new(InMemoryCache::new()));
    };

    let redis_config = RedisConfig {
        url: settings.url.clone(),
        connect_timeout: settings.connect_timeout,
    };

    match RedisCache::new(redis_config).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) if settings.fallback_to_memory => {
            tracing::warn!(error = %e, "Redis unavailable. Falling back to in-memory cache.");
            Some(Arc::new(InMemoryCache::new()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Redis unavailable. Post caching disabled.");
            None
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_cache(config: &AppConfig) -> Option<Arc<dyn Cache>> {
    if config.redis.is_some() {
        tracing::warn!("REDIS_URL set but the server was built without redis. Using in-memory cache.");
    }
    Some(Arc::new(InMemoryCache::new()))
}
