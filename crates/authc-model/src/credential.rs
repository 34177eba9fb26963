//! Per-account credential records.
//!
//! A record is read-only to the engine: it is sourced from the account store
//! (or the credential cache) and handed to the verification strategies.

use serde::{Deserialize, Serialize};

/// HMAC algorithm for TOTP generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotpAlgorithm {
    /// HMAC-SHA1 (RFC 6238 default, widely supported by authenticator apps).
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl TotpAlgorithm {
    /// Returns the algorithm name for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// A registered TOTP second factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpCredential {
    secret: Vec<u8>,
    digits: u8,
    period: u32,
    algorithm: TotpAlgorithm,
    look_around: u32,
}

impl TotpCredential {
    /// Creates a TOTP credential with RFC 6238 defaults
    /// (6 digits, 30 second period, SHA1, one period of clock drift).
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            digits: 6,
            period: 30,
            algorithm: TotpAlgorithm::Sha1,
            look_around: 1,
        }
    }

    /// Sets the number of digits, clamped to `1..=9`.
    ///
    /// Dynamic truncation yields a 31-bit value, so nine digits is the most
    /// a code can carry.
    #[must_use]
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = if digits == 0 {
            1
        } else if digits > 9 {
            9
        } else {
            digits
        };
        self
    }

    /// Sets the time period in seconds.
    #[must_use]
    pub const fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Sets the HMAC algorithm.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: TotpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the number of periods checked before/after the current one.
    #[must_use]
    pub const fn look_around(mut self, periods: u32) -> Self {
        self.look_around = periods;
        self
    }

    /// The shared secret.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// The number of digits in a code.
    #[must_use]
    pub const fn digit_count(&self) -> u8 {
        self.digits
    }

    /// The time period in seconds.
    #[must_use]
    pub const fn period_secs(&self) -> u32 {
        self.period
    }

    /// The HMAC algorithm.
    #[must_use]
    pub const fn hmac_algorithm(&self) -> TotpAlgorithm {
        self.algorithm
    }

    /// The look-around window in periods.
    #[must_use]
    pub const fn look_around_periods(&self) -> u32 {
        self.look_around
    }
}

/// Per-account credential material.
///
/// Cached by identifier under the credential domain; invalidated only by
/// explicit policy, never expired by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    identifier: String,
    realm: String,
    password_hash: String,
    totp: Option<TotpCredential>,
}

impl CredentialRecord {
    /// Creates a single-factor (password only) record.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        realm: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            realm: realm.into(),
            password_hash: password_hash.into(),
            totp: None,
        }
    }

    /// Registers a TOTP second factor, making it required for full success.
    #[must_use]
    pub fn with_totp(mut self, totp: TotpCredential) -> Self {
        self.totp = Some(totp);
        self
    }

    /// The account identifier this record belongs to.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The realm that sourced the record.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// The PHC-formatted password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// The registered TOTP credential, if any.
    #[must_use]
    pub const fn totp(&self) -> Option<&TotpCredential> {
        self.totp.as_ref()
    }

    /// Whether a second factor must be verified for full success.
    #[must_use]
    pub const fn requires_second_factor(&self) -> bool {
        self.totp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_factor_record() {
        let record = CredentialRecord::new("walter", "accounts", "$argon2id$...");
        assert!(!record.requires_second_factor());
        assert!(record.totp().is_none());
    }

    #[test]
    fn totp_registration_requires_second_factor() {
        let record = CredentialRecord::new("thedude", "accounts", "$argon2id$...")
            .with_totp(TotpCredential::new(b"shared secret".to_vec()));

        assert!(record.requires_second_factor());
        let totp = record.totp().unwrap();
        assert_eq!(totp.digit_count(), 6);
        assert_eq!(totp.period_secs(), 30);
        assert_eq!(totp.hmac_algorithm(), TotpAlgorithm::Sha1);
    }

    #[test]
    fn totp_builder_overrides() {
        let totp = TotpCredential::new(b"secret".to_vec())
            .digits(8)
            .period(60)
            .algorithm(TotpAlgorithm::Sha256)
            .look_around(2);

        assert_eq!(totp.digit_count(), 8);
        assert_eq!(totp.period_secs(), 60);
        assert_eq!(totp.look_around_periods(), 2);
    }

    #[test]
    fn digit_count_is_clamped_to_valid_range() {
        assert_eq!(TotpCredential::new(b"s".to_vec()).digits(10).digit_count(), 9);
        assert_eq!(TotpCredential::new(b"s".to_vec()).digits(0).digit_count(), 1);
        assert_eq!(TotpCredential::new(b"s".to_vec()).digits(9).digit_count(), 9);
    }
}
