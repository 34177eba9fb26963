//! In-memory cache backend.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::error::CacheResult;
use crate::provider::CacheProvider;

/// In-process cache backed by a concurrent map.
///
/// Entries never expire; callers evict explicitly. Suitable for tests and
/// single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<(String, String), Value>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheProvider for MemoryCache {
    async fn get(&self, domain: &str, identifier: &str) -> CacheResult<Option<Value>> {
        let key = (domain.to_string(), identifier.to_string());
        Ok(self.entries.get(&key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, domain: &str, identifier: &str, value: Value) -> CacheResult<()> {
        let key = (domain.to_string(), identifier.to_string());
        self.entries.insert(key, value);
        Ok(())
    }

    async fn delete(&self, domain: &str, identifier: &str) -> CacheResult<()> {
        let key = (domain.to_string(), identifier.to_string());
        self.entries.remove(&key);
        Ok(())
    }
}
