//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration surface consumed by the authentication engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthcConfig {
    /// Consecutive failures before an account is locked.
    ///
    /// Must be greater than zero. The engine re-reads the effective value on
    /// every lock check, so runtime changes apply to the next attempt rather
    /// than retroactively.
    pub account_lock_threshold: u32,
}

impl Default for AuthcConfig {
    fn default() -> Self {
        Self {
            account_lock_threshold: 3,
        }
    }
}

impl AuthcConfig {
    /// Creates a configuration with the given lock threshold.
    #[must_use]
    pub const fn new(account_lock_threshold: u32) -> Self {
        Self {
            account_lock_threshold,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLockThreshold`] if the threshold is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.account_lock_threshold == 0 {
            return Err(ConfigError::InvalidLockThreshold);
        }
        Ok(())
    }
}
