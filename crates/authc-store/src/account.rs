//! Account store trait and in-memory implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use authc_model::CredentialRecord;
use dashmap::DashMap;

use crate::error::StoreResult;

/// Provider of per-account credential records.
///
/// Implementations must be thread-safe. Credential data must never be
/// logged by an implementation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Finds the credential record for an identifier.
    ///
    /// Returns `Ok(None)` if no account backs the identifier.
    async fn find(&self, identifier: &str) -> StoreResult<Option<CredentialRecord>>;
}

/// In-memory account store.
///
/// Keeps a `find` call counter so tests can assert that cached lookups do
/// not touch the store.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<String, CredentialRecord>,
    finds: AtomicU64,
}

impl MemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account record.
    pub fn insert(&self, record: CredentialRecord) {
        self.accounts.insert(record.identifier().to_string(), record);
    }

    /// Removes an account record.
    pub fn remove(&self, identifier: &str) {
        self.accounts.remove(identifier);
    }

    /// Returns how many times `find` has been called.
    #[must_use]
    pub fn find_count(&self) -> u64 {
        self.finds.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find(&self, identifier: &str) -> StoreResult<Option<CredentialRecord>> {
        self.finds.fetch_add(1, Ordering::Relaxed);
        Ok(self.accounts.get(identifier).map(|entry| entry.value().clone()))
    }
}
