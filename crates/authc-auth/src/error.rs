//! Authentication failure taxonomy.
//!
//! Every failure is terminal for the current `authenticate` call; nothing is
//! retried internally. Failures carry the subject identifier when known so
//! callers can correlate them with published events.

use std::fmt;

use authc_cache::CacheError;
use authc_store::StoreError;

/// Authentication failures.
#[derive(Debug)]
pub enum AuthError {
    /// A second-factor token was presented with no prior progress identity.
    ///
    /// This is a caller protocol error, not an account-state event; no event
    /// is published for it.
    InvalidSequence {
        /// The claimed identifier.
        identifier: String,
    },
    /// The claimed identifier has no backing record.
    AccountNotFound {
        /// The claimed identifier.
        identifier: String,
    },
    /// The account is locked; attempts are rejected regardless of
    /// credential correctness until an explicit unlock.
    AccountLocked {
        /// The resolved identifier.
        identifier: String,
    },
    /// Strategy verification failed and the lock threshold was not reached.
    InvalidCredentials {
        /// The resolved identifier.
        identifier: String,
    },
    /// A collaborator (cache or account store) was unavailable.
    ///
    /// Never reinterpreted as an account-state failure.
    CollaboratorUnavailable {
        /// What failed.
        message: String,
    },
    /// Internal engine error (e.g. malformed stored credential data).
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl AuthError {
    /// The subject identifier, when the failure is tied to an account.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::InvalidSequence { identifier }
            | Self::AccountNotFound { identifier }
            | Self::AccountLocked { identifier }
            | Self::InvalidCredentials { identifier } => Some(identifier),
            Self::CollaboratorUnavailable { .. } | Self::Internal { .. } => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSequence { identifier } => {
                write!(f, "second factor for '{identifier}' cannot open a new attempt")
            }
            Self::AccountNotFound { identifier } => {
                write!(f, "no account found for '{identifier}'")
            }
            Self::AccountLocked { identifier } => {
                write!(f, "account '{identifier}' is locked")
            }
            Self::InvalidCredentials { identifier } => {
                write!(f, "invalid credentials for '{identifier}'")
            }
            Self::CollaboratorUnavailable { message } => {
                write!(f, "collaborator unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "internal authentication error: {message}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::CollaboratorUnavailable {
            message: err.to_string(),
        }
    }
}

impl From<CacheError> for AuthError {
    fn from(err: CacheError) -> Self {
        Self::CollaboratorUnavailable {
            message: err.to_string(),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_identifier() {
        let err = AuthError::AccountLocked {
            identifier: "walter".to_string(),
        };
        assert_eq!(err.identifier(), Some("walter"));
        assert!(err.to_string().contains("walter"));
    }

    #[test]
    fn collaborator_failure_has_no_identifier() {
        let err = AuthError::from(StoreError::Connection("refused".to_string()));
        assert!(err.identifier().is_none());
        assert!(matches!(err, AuthError::CollaboratorUnavailable { .. }));
    }

    #[test]
    fn cache_failure_maps_to_collaborator() {
        let err = AuthError::from(CacheError::Timeout);
        assert!(matches!(err, AuthError::CollaboratorUnavailable { .. }));
    }
}
