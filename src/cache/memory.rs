//! In-memory cache implementation

use super::CacheEntry;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory cache implementation.
///
/// Grows with the number of distinct keys and is dropped with the process.
pub struct MemoryCache {
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Create a new in-memory cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<CacheEntry> {
        let cache = self.cache.read();
        cache.get(key).cloned()
    }

    async fn set(&self, key: String, entry: CacheEntry) {
        let mut cache = self.cache.write();
        cache.insert(key, entry);
    }

    async fn delete(&self, key: &str) {
        let mut cache = self.cache.write();
        cache.remove(key);
    }

    async fn clear(&self) {
        let mut cache = self.cache.write();
        cache.clear();
    }

    async fn len(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_cache_basic() {
        let cache = MemoryCache::new();

        cache
            .set("zezima".to_string(), CacheEntry::now(json!({"level": 99})))
            .await;
        let entry = cache.get("zezima").await.expect("entry");
        assert_eq!(entry.data, json!({"level": 99}));

        cache.delete("zezima").await;
        assert!(cache.get("zezima").await.is_none());

        cache
            .set("woox".to_string(), CacheEntry::now(json!({"level": 1})))
            .await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_replaces_wholesale() {
        let cache = MemoryCache::new();

        cache
            .set("lynx".to_string(), CacheEntry::now(json!({"a": 1, "b": 2})))
            .await;
        cache
            .set("lynx".to_string(), CacheEntry::now(json!({"c": 3})))
            .await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("lynx").await.expect("entry").data, json!({"c": 3}));
    }
}
