//! Configuration error types.

use thiserror::Error;

/// Errors raised while validating engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The account lock threshold must be greater than zero.
    #[error("account_lock_threshold must be greater than zero")]
    InvalidLockThreshold,
}
