//! Credential cache adapter.
//!
//! Scopes the opaque cache to credential records under a fixed domain and
//! makes the hit/miss outcome observable so the engine can report cache
//! effectiveness in its diagnostics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use authc_model::CredentialRecord;

use crate::error::{CacheError, CacheResult};
use crate::provider::CacheProvider;

/// Cache domain for credential records.
pub const CREDENTIALS_DOMAIN: &str = "credentials";

/// Outcome of a credential cache lookup.
///
/// A hit and a miss lead to the same authentication outcome, but the
/// distinction is observable for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The record was served from the cache.
    Hit(CredentialRecord),
    /// The record was not cached; the caller should fall through to the
    /// account store and write back on a store hit.
    Miss,
}

/// Hit/miss counters for the credential cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that fell through to the account store.
    pub misses: u64,
}

/// Domain-scoped credential cache.
pub struct CredentialCache {
    inner: Arc<dyn CacheProvider>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CredentialCache {
    /// Creates an adapter over the given cache backend.
    #[must_use]
    pub fn new(inner: Arc<dyn CacheProvider>) -> Self {
        Self {
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up the cached record for an identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the backend fails or a cached value
    /// cannot be decoded. Backend failures are never reported as misses.
    pub async fn lookup(&self, identifier: &str) -> CacheResult<CacheLookup> {
        match self.inner.get(CREDENTIALS_DOMAIN, identifier).await? {
            Some(value) => {
                let record: CredentialRecord = serde_json::from_value(value)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(identifier, "serving cached credentials");
                Ok(CacheLookup::Hit(record))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    identifier,
                    "could not obtain cached credentials, deferring to account store"
                );
                Ok(CacheLookup::Miss)
            }
        }
    }

    /// Writes a record back to the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the backend fails or the record cannot be
    /// encoded.
    pub async fn store(&self, record: &CredentialRecord) -> CacheResult<()> {
        let value = serde_json::to_value(record)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.inner
            .set(CREDENTIALS_DOMAIN, record.identifier(), value)
            .await
    }

    /// Removes the cached record for an identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] if the backend fails.
    pub async fn evict(&self, identifier: &str) -> CacheResult<()> {
        self.inner.delete(CREDENTIALS_DOMAIN, identifier).await
    }

    /// Returns the hit/miss counters accumulated by this adapter.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
