//! Account identity returned on (partial or full) authentication success.

use serde::{Deserialize, Serialize};

/// An identifier scoped to the realm that resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmIdentifier {
    realm: String,
    identifier: String,
}

impl RealmIdentifier {
    /// Creates a realm-scoped identifier.
    #[must_use]
    pub fn new(realm: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            identifier: identifier.into(),
        }
    }

    /// The realm that resolved the identifier.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// The identifier within the realm.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// The canonical principal reference produced by the authenticator.
///
/// Wraps one or more realm-scoped identifiers ordered by realm priority.
/// The first entry is the primary identifier. An identity produced by a
/// partial success is the continuation token for the next factor of the
/// same attempt; the engine never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    identifiers: Vec<RealmIdentifier>,
}

impl AccountIdentity {
    /// Creates an identity with a single realm-scoped identifier.
    #[must_use]
    pub fn single(realm: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifiers: vec![RealmIdentifier::new(realm, identifier)],
        }
    }

    /// Appends a lower-priority realm identifier.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.identifiers.push(RealmIdentifier::new(realm, identifier));
        self
    }

    /// The highest-priority identifier.
    #[must_use]
    pub fn primary_identifier(&self) -> &str {
        // Constructors guarantee at least one entry.
        self.identifiers[0].identifier()
    }

    /// All identifiers, ordered by realm priority.
    #[must_use]
    pub fn identifiers(&self) -> &[RealmIdentifier] {
        &self.identifiers
    }

    /// Looks up the identifier resolved by a specific realm.
    #[must_use]
    pub fn from_realm(&self, realm: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|entry| entry.realm() == realm)
            .map(RealmIdentifier::identifier)
    }
}
