//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! SeaORM and in-memory repositories, Redis and in-memory caches, and the
//! JWT / Argon2 authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `sqlite` - SQLite database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `redis` - Redis-backed post cache

pub mod cache;
pub mod database;
pub mod redact;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::{
    InMemoryCommentRepository, InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository,
};
pub use redact::mask_email;

#[cfg(feature = "database")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
