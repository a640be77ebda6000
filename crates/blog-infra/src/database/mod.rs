//! Persistence adapters: SeaORM repositories and their in-memory counterparts.

mod memory;

#[cfg(feature = "database")]
mod connections;
#[cfg(feature = "database")]
pub mod entity;
#[cfg(feature = "database")]
mod error;
#[cfg(feature = "database")]
mod postgres_base;
#[cfg(feature = "database")]
pub mod postgres_repo;

pub use memory::{
    InMemoryCommentRepository, InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "database")]
pub use connections::{DatabaseConfig, DatabaseConnections};
#[cfg(feature = "database")]
pub use postgres_base::{DomainMapped, PostgresBaseRepository};
#[cfg(feature = "database")]
pub use postgres_repo::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};
