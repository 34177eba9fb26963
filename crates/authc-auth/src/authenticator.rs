//! The authentication orchestrator.
//!
//! Sequences first- and second-factor verification, resolves accounts
//! through the credential cache with account-store fallback, enforces the
//! lockout policy fail-closed, and publishes one lifecycle event at every
//! decision point.

use std::sync::Arc;

use authc_cache::{CacheLookup, CacheStats, CredentialCache};
use authc_core::{AuthcConfig, AuthenticationEvent, EventBus, EventTopic};
use authc_model::{AccountIdentity, CredentialRecord, Token};
use authc_store::AccountStore;

use crate::error::{AuthError, AuthResult};
use crate::lock::LockTracker;
use crate::strategy;

/// Successful-but-possibly-incomplete authentication outcome.
///
/// Partial success is a first-class variant, not an error: one factor
/// verified, more required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// All required factors verified.
    Authenticated(AccountIdentity),
    /// A factor verified but more are required. The carried identity is the
    /// continuation token for the next `authenticate` call.
    AdditionalFactorRequired(AccountIdentity),
}

impl AuthOutcome {
    /// Whether authentication is complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The resolved identity, complete or not.
    #[must_use]
    pub const fn identity(&self) -> &AccountIdentity {
        match self {
            Self::Authenticated(identity) | Self::AdditionalFactorRequired(identity) => identity,
        }
    }

    /// Consumes the outcome, returning the identity.
    #[must_use]
    pub fn into_identity(self) -> AccountIdentity {
        match self {
            Self::Authenticated(identity) | Self::AdditionalFactorRequired(identity) => identity,
        }
    }
}

/// The authentication engine.
///
/// Safe to call concurrently for different identifiers; per-identifier lock
/// state is serialized internally. The engine is the sole writer of lock
/// state and the sole publisher of authentication events.
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    credentials: CredentialCache,
    bus: Arc<dyn EventBus>,
    locks: LockTracker,
}

impl Authenticator {
    /// Creates an engine over the injected collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AccountStore>,
        credentials: CredentialCache,
        bus: Arc<dyn EventBus>,
        config: &AuthcConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            bus,
            locks: LockTracker::new(config.account_lock_threshold),
        }
    }

    /// Authenticates one factor.
    ///
    /// `pending_identity` is `None` for a fresh attempt; it is the identity
    /// returned by a prior [`AuthOutcome::AdditionalFactorRequired`] when
    /// continuing a multi-factor sequence.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`AuthError`] for this call; see the failure
    /// taxonomy. Collaborator failures propagate as
    /// [`AuthError::CollaboratorUnavailable`] and are never reinterpreted as
    /// account-state failures.
    pub async fn authenticate(
        &self,
        pending_identity: Option<AccountIdentity>,
        token: Token,
    ) -> AuthResult<AuthOutcome> {
        // A second factor can never open a brand-new attempt. Caller
        // protocol error: no account lookup, no lock check, no event.
        if token.is_second_factor() && pending_identity.is_none() {
            tracing::warn!(
                identifier = token.identifier(),
                factor = token.kind().as_str(),
                "second factor presented without prior progress"
            );
            return Err(AuthError::InvalidSequence {
                identifier: token.identifier().to_string(),
            });
        }

        let (identity, record) = match pending_identity {
            // Continuing: reuse the resolved identity; credential material
            // is re-read through the cache (a hit, barring eviction).
            Some(identity) => {
                let identifier = identity.primary_identifier().to_string();
                match self.load_credentials(&identifier).await? {
                    Some(record) => (identity, record),
                    None => return Err(self.account_not_found(identifier)),
                }
            }
            // Fresh attempt: resolve the claimed identifier.
            None => {
                let claimed = token.identifier().to_string();
                match self.load_credentials(&claimed).await? {
                    Some(record) => {
                        let identity =
                            AccountIdentity::single(record.realm(), record.identifier());
                        (identity, record)
                    }
                    None => return Err(self.account_not_found(claimed)),
                }
            }
        };

        let subject = identity.primary_identifier().to_string();

        // Fail closed: a locked account never authenticates, even with
        // correct credentials, and the attempt is not re-penalized.
        if self.locks.is_locked(&subject) {
            self.publish(EventTopic::AccountLocked, &subject);
            return Err(AuthError::AccountLocked { identifier: subject });
        }

        if !strategy::verify_token(&token, &record)? {
            let outcome = self.locks.record_failure(&subject);
            self.publish(EventTopic::Failed, &subject);

            if outcome.just_locked {
                self.publish(EventTopic::AccountLocked, &subject);
                return Err(AuthError::AccountLocked { identifier: subject });
            }
            return Err(AuthError::InvalidCredentials { identifier: subject });
        }

        // A successful factor clears prior failed attempts for the chain.
        self.locks.record_success(&subject);

        if record.requires_second_factor() && !token.is_second_factor() {
            self.publish(EventTopic::Progress, &subject);
            return Ok(AuthOutcome::AdditionalFactorRequired(identity));
        }

        self.publish(EventTopic::Succeeded, &subject);
        tracing::info!(identifier = %subject, "authentication complete");
        Ok(AuthOutcome::Authenticated(identity))
    }

    /// The lock tracker, for explicit unlock and threshold changes.
    #[must_use]
    pub const fn locks(&self) -> &LockTracker {
        &self.locks
    }

    /// Changes the account lock threshold at runtime.
    ///
    /// Takes effect on the next lock check, not retroactively.
    pub fn set_lock_threshold(&self, threshold: u32) {
        self.locks.set_threshold(threshold);
    }

    /// Hit/miss counters of the credential cache, for diagnostics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.credentials.stats()
    }

    /// Invalidates the cached credentials for an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CollaboratorUnavailable`] if the cache backend
    /// fails.
    pub async fn invalidate_credentials(&self, identifier: &str) -> AuthResult<()> {
        self.credentials.evict(identifier).await?;
        Ok(())
    }

    /// Read-through credential load: cache first, then the account store
    /// with a cache write-back on a store hit.
    async fn load_credentials(&self, identifier: &str) -> AuthResult<Option<CredentialRecord>> {
        match self.credentials.lookup(identifier).await? {
            CacheLookup::Hit(record) => Ok(Some(record)),
            CacheLookup::Miss => match self.store.find(identifier).await? {
                Some(record) => {
                    self.credentials.store(&record).await?;
                    Ok(Some(record))
                }
                None => Ok(None),
            },
        }
    }

    fn account_not_found(&self, identifier: String) -> AuthError {
        tracing::info!(identifier = %identifier, "no account found");
        self.publish(EventTopic::AccountNotFound, &identifier);
        AuthError::AccountNotFound { identifier }
    }

    fn publish(&self, topic: EventTopic, identifier: &str) {
        self.bus.publish(AuthenticationEvent::new(topic, identifier));
    }
}
