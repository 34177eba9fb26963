//! # authc-store
//!
//! Account store contract consumed by the authc authentication engine.
//!
//! The store supplies raw credential records keyed by identifier. Absence of
//! a record is a normal `None` outcome, not an error; errors are reserved
//! for the backend being unavailable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod error;

pub use account::{AccountStore, MemoryAccountStore};
pub use error::{StoreError, StoreResult};
