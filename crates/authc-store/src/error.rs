//! Store error types.

use thiserror::Error;

/// Errors that can occur while talking to the account store backend.
///
/// A missing account is not an error; `find` returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend connection error.
    #[error("store connection error: {0}")]
    Connection(String),

    /// Backend query error.
    #[error("store query error: {0}")]
    Query(String),

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
