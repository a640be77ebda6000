//! In-memory cache implementation - used when Redis is not configured or unreachable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Expired entries are dropped when read and swept on every write, so keys
/// that are never read again do not accumulate. Data is lost on process restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let store = self.store.read().await;
        store.values().filter(|e| !e.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn entry(value: &str, ttl: Option<Duration>, now: Instant) -> CacheEntry {
    CacheEntry {
        value: value.to_string(),
        expires_at: ttl.map(|d| now + d),
    }
}

fn sweep(store: &mut HashMap<String, CacheEntry>, now: Instant) {
    store.retain(|_, e| !e.is_expired(now));
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: take the write lock and re-check before removing.
        let mut store = self.store.write().await;
        if store.get(key).is_some_and(|e| e.is_expired(now)) {
            store.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        sweep(&mut store, now);
        store.insert(key.to_string(), entry(value, ttl, now));
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        sweep(&mut store, now);
        if store.contains_key(key) {
            return Ok(false);
        }
        store.insert(key.to_string(), entry(value, ttl, now));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}
