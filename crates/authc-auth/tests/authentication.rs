//! End-to-end authentication scenarios against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use authc_auth::{strategy, AuthError, AuthOutcome, Authenticator, PasswordHasherService};
use authc_cache::{CredentialCache, MemoryCache};
use authc_core::{AuthcConfig, EventTopic, InProcessEventBus};
use authc_model::{CredentialRecord, PasswordToken, Token, TotpCredential, TotpToken};
use authc_store::{AccountStore, MemoryAccountStore, StoreError, StoreResult};

const WALTER_PASSWORD: &str = "vietnam";
const DUDE_PASSWORD: &str = "nihilist";
const DUDE_TOTP_SECRET: &[u8] = b"letsgobowlingggggg";

struct Harness {
    engine: Arc<Authenticator>,
    store: Arc<MemoryAccountStore>,
    bus: Arc<InProcessEventBus>,
}

/// Builds an engine over in-memory collaborators with two provisioned
/// accounts: `walter` (password only) and `thedude` (password + TOTP).
fn harness(threshold: u32) -> Harness {
    let hasher = PasswordHasherService::with_defaults();

    let store = Arc::new(MemoryAccountStore::new());
    store.insert(CredentialRecord::new(
        "walter",
        "accounts",
        hasher.hash(WALTER_PASSWORD).unwrap(),
    ));
    store.insert(
        CredentialRecord::new("thedude", "accounts", hasher.hash(DUDE_PASSWORD).unwrap())
            .with_totp(TotpCredential::new(DUDE_TOTP_SECRET.to_vec())),
    );

    let bus = Arc::new(InProcessEventBus::new());
    let engine = Arc::new(Authenticator::new(
        Arc::clone(&store) as Arc<dyn AccountStore>,
        CredentialCache::new(Arc::new(MemoryCache::new())),
        Arc::clone(&bus) as Arc<dyn authc_core::EventBus>,
        &AuthcConfig::new(threshold),
    ));

    Harness { engine, store, bus }
}

fn watch(bus: &InProcessEventBus, topic: EventTopic) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(topic, move |event| {
        sink.lock().unwrap().push(event.identifier.clone());
    });
    seen
}

fn walter_valid() -> Token {
    PasswordToken::new("walter", WALTER_PASSWORD)
        .host("127.0.0.1")
        .into()
}

fn walter_invalid() -> Token {
    PasswordToken::new("walter", "wrong").into()
}

fn dude_totp_code() -> String {
    strategy::current_code(&TotpCredential::new(DUDE_TOTP_SECRET.to_vec())).unwrap()
}

#[tokio::test]
async fn single_factor_success_publishes_succeeded() {
    let h = harness(3);
    let succeeded = watch(&h.bus, EventTopic::Succeeded);

    let outcome = h.engine.authenticate(None, walter_valid()).await.unwrap();

    let AuthOutcome::Authenticated(identity) = outcome else {
        panic!("expected full success");
    };
    assert_eq!(identity.primary_identifier(), "walter");
    assert_eq!(succeeded.lock().unwrap().as_slice(), ["walter"]);
    assert_eq!(h.engine.locks().failure_count("walter"), 0);
}

#[tokio::test]
async fn success_publishes_exactly_one_event() {
    let h = harness(3);
    let topics = [
        EventTopic::Progress,
        EventTopic::Succeeded,
        EventTopic::Failed,
        EventTopic::AccountNotFound,
        EventTopic::AccountLocked,
    ];
    let watches: Vec<_> = topics.iter().map(|t| watch(&h.bus, *t)).collect();

    h.engine.authenticate(None, walter_valid()).await.unwrap();

    let total: usize = watches.iter().map(|w| w.lock().unwrap().len()).sum();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn second_factor_without_progress_is_invalid_sequence() {
    let h = harness(3);
    let failed = watch(&h.bus, EventTopic::Failed);

    let err = h
        .engine
        .authenticate(None, TotpToken::new("thedude", dude_totp_code()).into())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidSequence { .. }));
    assert_eq!(err.identifier(), Some("thedude"));
    // Pre-resolution protocol error: no event, no store lookup.
    assert!(failed.lock().unwrap().is_empty());
    assert_eq!(h.store.find_count(), 0);
}

#[tokio::test]
async fn multi_factor_sequence_succeeds() {
    let h = harness(3);
    let progress = watch(&h.bus, EventTopic::Progress);
    let succeeded = watch(&h.bus, EventTopic::Succeeded);

    let first = h
        .engine
        .authenticate(None, PasswordToken::new("thedude", DUDE_PASSWORD).into())
        .await
        .unwrap();

    let AuthOutcome::AdditionalFactorRequired(pending) = first else {
        panic!("expected partial success for a totp-registered account");
    };
    assert_eq!(progress.lock().unwrap().as_slice(), ["thedude"]);
    assert!(succeeded.lock().unwrap().is_empty());

    let second = h
        .engine
        .authenticate(
            Some(pending),
            TotpToken::new("thedude", dude_totp_code()).into(),
        )
        .await
        .unwrap();

    assert!(second.is_complete());
    assert_eq!(second.identity().primary_identifier(), "thedude");
    assert_eq!(
        progress.lock().unwrap().as_slice(),
        succeeded.lock().unwrap().as_slice()
    );
}

#[tokio::test]
async fn wrong_password_publishes_failed() {
    let h = harness(3);
    let failed = watch(&h.bus, EventTopic::Failed);

    let err = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials { .. }));
    assert_eq!(err.identifier(), Some("walter"));
    assert_eq!(failed.lock().unwrap().as_slice(), ["walter"]);
    assert_eq!(h.engine.locks().failure_count("walter"), 1);
}

#[tokio::test]
async fn wrong_second_factor_counts_as_failure() {
    let h = harness(3);

    let first = h
        .engine
        .authenticate(None, PasswordToken::new("thedude", DUDE_PASSWORD).into())
        .await
        .unwrap();
    let pending = first.into_identity();

    let err = h
        .engine
        .authenticate(
            Some(pending),
            TotpToken::new("thedude", "0000000").into(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials { .. }));
    assert_eq!(h.engine.locks().failure_count("thedude"), 1);
}

#[tokio::test]
async fn unknown_identifier_publishes_account_not_found() {
    let h = harness(3);
    let not_found = watch(&h.bus, EventTopic::AccountNotFound);

    let err = h
        .engine
        .authenticate(None, PasswordToken::new("dumb", "token").host("127.0.0.1").into())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::AccountNotFound { .. }));
    assert_eq!(err.identifier(), Some("dumb"));
    assert_eq!(not_found.lock().unwrap().as_slice(), ["dumb"]);
}

#[tokio::test]
async fn credentials_are_cached_after_first_resolution() {
    let h = harness(3);

    // First attempt fails but still resolves and caches the record.
    let _ = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    assert_eq!(h.store.find_count(), 1);
    let stats = h.engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);

    // Second attempt is served from the cache; the store is not touched.
    let outcome = h.engine.authenticate(None, walter_valid()).await.unwrap();
    assert!(outcome.is_complete());
    assert_eq!(h.store.find_count(), 1);
    let stats = h.engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn invalidated_credentials_fall_back_to_store() {
    let h = harness(3);

    let _ = h.engine.authenticate(None, walter_valid()).await.unwrap();
    h.engine.invalidate_credentials("walter").await.unwrap();

    let _ = h.engine.authenticate(None, walter_valid()).await.unwrap();
    assert_eq!(h.store.find_count(), 2);
}

#[tokio::test]
async fn lockout_crosses_threshold_and_fails_closed() {
    let h = harness(3);
    let failed = watch(&h.bus, EventTopic::Failed);
    let locked = watch(&h.bus, EventTopic::AccountLocked);
    let succeeded = watch(&h.bus, EventTopic::Succeeded);

    for _ in 0..2 {
        let err = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
    }

    // The crossing attempt reports the lock, not a generic failure.
    let err = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked { .. }));
    assert_eq!(failed.lock().unwrap().len(), 3);
    assert_eq!(locked.lock().unwrap().as_slice(), ["walter"]);

    // Correct credentials are rejected while locked and not re-penalized.
    let err = h.engine.authenticate(None, walter_valid()).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked { .. }));
    assert_eq!(h.engine.locks().failure_count("walter"), 3);
    assert_eq!(failed.lock().unwrap().len(), 3);
    assert_eq!(locked.lock().unwrap().len(), 2);
    assert!(succeeded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unlock_restores_access_and_resets_counter() {
    let h = harness(2);

    for _ in 0..2 {
        let _ = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    }
    assert!(h.engine.locks().is_locked("walter"));

    h.engine.locks().unlock("walter");

    let outcome = h.engine.authenticate(None, walter_valid()).await.unwrap();
    assert!(outcome.is_complete());
    assert_eq!(h.engine.locks().failure_count("walter"), 0);
}

#[tokio::test]
async fn success_resets_failure_count_below_threshold() {
    let h = harness(3);

    for _ in 0..2 {
        let _ = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    }
    assert_eq!(h.engine.locks().failure_count("walter"), 2);

    let _ = h.engine.authenticate(None, walter_valid()).await.unwrap();
    assert_eq!(h.engine.locks().failure_count("walter"), 0);
    assert!(!h.engine.locks().is_locked("walter"));
}

#[tokio::test]
async fn threshold_change_applies_to_next_attempt() {
    let h = harness(10);

    for _ in 0..2 {
        let _ = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    }
    h.engine.set_lock_threshold(3);

    let err = h.engine.authenticate(None, walter_invalid()).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked { .. }));
}

struct FailingStore;

#[async_trait]
impl AccountStore for FailingStore {
    async fn find(&self, _identifier: &str) -> StoreResult<Option<CredentialRecord>> {
        Err(StoreError::Connection("store offline".to_string()))
    }
}

#[tokio::test]
async fn store_outage_is_collaborator_failure_not_account_not_found() {
    let bus = Arc::new(InProcessEventBus::new());
    let not_found = watch(&bus, EventTopic::AccountNotFound);

    let engine = Authenticator::new(
        Arc::new(FailingStore),
        CredentialCache::new(Arc::new(MemoryCache::new())),
        Arc::clone(&bus) as Arc<dyn authc_core::EventBus>,
        &AuthcConfig::default(),
    );

    let err = engine.authenticate(None, walter_valid()).await.unwrap_err();

    assert!(matches!(err, AuthError::CollaboratorUnavailable { .. }));
    assert!(not_found.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_failures_never_slip_past_the_threshold() {
    let h = harness(4);
    let succeeded = watch(&h.bus, EventTopic::Succeeded);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&h.engine);
        handles.push(tokio::spawn(async move {
            engine.authenticate(None, walter_invalid()).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_err());
    }

    assert!(h.engine.locks().is_locked("walter"));

    // Even correct credentials are rejected once the combined failures
    // crossed the threshold.
    let err = h.engine.authenticate(None, walter_valid()).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked { .. }));
    assert!(succeeded.lock().unwrap().is_empty());
}
