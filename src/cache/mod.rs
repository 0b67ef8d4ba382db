//! Cache module
//!
//! Holds fetched player data keyed by username. Entries carry the instant
//! they were fetched; freshness is decided by the reader, so nothing here
//! expires on its own.

pub mod memory;

use std::time::Duration;
use tokio::time::Instant;

/// One cached player payload
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Payload exactly as the sync service returned it
    pub data: serde_json::Value,
    /// When the payload was fetched
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    #[must_use]
    pub fn now(data: serde_json::Value) -> Self {
        Self {
            data,
            fetched_at: Instant::now(),
        }
    }

    /// Whether the entry is younger than `ttl` at `now`
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Cache trait
#[async_trait::async_trait]
pub trait Cache: Send + Sync {
    /// Get cached entry
    async fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or replace an entry
    async fn set(&self, key: String, entry: CacheEntry);

    /// Delete cached entry
    async fn delete(&self, key: &str);

    /// Clear cache
    async fn clear(&self);

    /// Number of stored entries
    async fn len(&self) -> usize;

    /// Whether the cache holds no entries
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Cache configuration
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long player data stays fresh (seconds)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl CacheConfig {
    /// TTL as a `Duration`
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Create the process-wide player data cache
#[must_use]
pub fn create_cache() -> Box<dyn Cache> {
    Box::new(memory::MemoryCache::new())
}
