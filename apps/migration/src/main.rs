//! Schema initialization tool.
//!
//! Connects to `DATABASE_URL` and creates the users, posts and comments
//! tables if they are missing. Safe to run repeatedly.

use std::process::ExitCode;
use std::sync::Arc;

use blog_core::error::RepoError;
use blog_core::ports::BaseRepository;
use blog_infra::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};
use thiserror::Error;

#[derive(Debug, Error)]
enum MigrationError {
    #[error("DATABASE_URL is not set")]
    MissingUrl,

    #[error("database connection failed: {0}")]
    Connect(String),

    #[error("schema initialization failed: {0}")]
    Schema(#[from] RepoError),
}

async fn run() -> Result<(), MigrationError> {
    let url = std::env::var("DATABASE_URL").map_err(|_| MigrationError::MissingUrl)?;

    let mut config = DatabaseConfig::new(url);
    config.max_connections = 2;
    config.min_connections = 1;

    let connections = DatabaseConnections::init(&config)
        .await
        .map_err(|e| MigrationError::Connect(e.to_string()))?;
    let conn = Arc::new(connections.main);

    // Parents before children so foreign keys resolve.
    PostgresUserRepository::new(conn.clone()).init_schema().await?;
    tracing::info!("users ready");
    PostgresPostRepository::new(conn.clone()).init_schema().await?;
    tracing::info!("posts ready");
    PostgresCommentRepository::new(conn).init_schema().await?;
    tracing::info!("comments ready");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    match run().await {
        Ok(()) => {
            tracing::info!("Schema up to date");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Migration failed");
            ExitCode::FAILURE
        }
    }
}
