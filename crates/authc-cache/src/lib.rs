//! # authc-cache
//!
//! Cache contract consumed by the authc authentication engine, plus the
//! credential cache adapter that scopes it to credential records.
//!
//! The cache itself has no authentication semantics: it is an opaque
//! key-value store addressed by `(domain, identifier)`. Eviction policy is
//! the implementation's concern; the engine never manages TTLs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod memory;
pub mod provider;

pub use credential::{CacheLookup, CacheStats, CredentialCache, CREDENTIALS_DOMAIN};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use provider::CacheProvider;
