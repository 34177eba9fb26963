//! Cache provider trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CacheResult;

/// Key-value cache addressed by `(domain, identifier)`.
///
/// Implementations must be thread-safe and support concurrent access. All
/// operations are async to support both local and distributed caches. Values
/// are opaque JSON documents; typed access lives in the adapters built on
/// top of this trait.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Gets a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, domain: &str, identifier: &str) -> CacheResult<Option<Value>>;

    /// Sets a value in the cache.
    ///
    /// Expiration, if any, is the implementation's policy.
    async fn set(&self, domain: &str, identifier: &str, value: Value) -> CacheResult<()>;

    /// Deletes a value from the cache.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    async fn delete(&self, domain: &str, identifier: &str) -> CacheResult<()>;
}
