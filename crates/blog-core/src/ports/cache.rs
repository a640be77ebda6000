use async_trait::async_trait;
use std::time::Duration;

/// Cache trait - abstraction over caching backends (Redis, in-memory).
///
/// Lookups distinguish three outcomes: `Ok(Some(_))` is a hit, `Ok(None)` is
/// a miss and `Err(_)` is a transport failure. Callers fall through to the
/// source of truth on both of the latter.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from the cache.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Set a value in the cache with optional TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Set a value only if the key holds nothing live. Returns whether the
    /// value was written.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, CacheError>;

    /// Delete a key from the cache. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
