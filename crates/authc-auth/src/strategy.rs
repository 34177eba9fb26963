//! Verification strategies, one per factor kind.
//!
//! Strategies decide match/no-match for a token against a credential record.
//! They are pure with respect to lock and cache state; all side effects are
//! orchestrated by the authenticator. Dispatch is a closed match over the
//! token enum, so adding a factor kind is a compile-time exhaustiveness
//! error until its strategy exists.

use std::time::{SystemTime, UNIX_EPOCH};

use authc_model::{CredentialRecord, PasswordToken, Token, TotpAlgorithm, TotpCredential, TotpToken};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::error::{AuthError, AuthResult};
use crate::password;

/// Dispatches a token to the strategy matching its factor kind.
///
/// # Errors
///
/// Returns [`AuthError::Internal`] for malformed stored credential data or
/// clock failure; a plain mismatch is `Ok(false)`.
pub fn verify_token(token: &Token, record: &CredentialRecord) -> AuthResult<bool> {
    match token {
        Token::Password(t) => PasswordStrategy.verify(t, record),
        Token::Totp(t) => TotpStrategy.verify(t, record),
    }
}

/// Password-hash comparison strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordStrategy;

impl PasswordStrategy {
    /// Verifies a password token against the record's stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the stored hash is malformed.
    pub fn verify(&self, token: &PasswordToken, record: &CredentialRecord) -> AuthResult<bool> {
        password::verify_hash(token.secret(), record.password_hash())
    }
}

/// TOTP window-comparison strategy (RFC 6238).
#[derive(Debug, Clone, Copy, Default)]
pub struct TotpStrategy;

impl TotpStrategy {
    /// Verifies a one-time code against the record's registered TOTP
    /// credential, checking the configured look-around window.
    ///
    /// An account with no registered TOTP credential never matches.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the system clock is unavailable.
    pub fn verify(&self, token: &TotpToken, record: &CredentialRecord) -> AuthResult<bool> {
        let Some(totp) = record.totp() else {
            return Ok(false);
        };

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Internal {
                message: e.to_string(),
            })?;
        let current = now.as_secs() / u64::from(totp.period_secs());

        for offset in 0..=u64::from(totp.look_around_periods()) {
            if check_code(totp, current.saturating_add(offset), token.code())? {
                return Ok(true);
            }
            if offset > 0 && check_code(totp, current.saturating_sub(offset), token.code())? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Generates the code for the current time period.
///
/// Exposed for provisioning flows and tests; verification always goes
/// through [`TotpStrategy::verify`].
///
/// # Errors
///
/// Returns [`AuthError::Internal`] if the system clock is unavailable.
pub fn current_code(totp: &TotpCredential) -> AuthResult<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AuthError::Internal {
            message: e.to_string(),
        })?;
    generate_code(totp, now.as_secs() / u64::from(totp.period_secs()))
}

/// Generates the code for a counter value.
///
/// # Errors
///
/// Returns [`AuthError::Internal`] if the HMAC key is rejected.
pub fn generate_code(totp: &TotpCredential, counter: u64) -> AuthResult<String> {
    let digest = compute_hmac(totp.hmac_algorithm(), totp.secret(), counter)?;
    let code = truncate(&digest, totp.digit_count());
    Ok(format!(
        "{:0width$}",
        code,
        width = totp.digit_count() as usize
    ))
}

fn check_code(totp: &TotpCredential, counter: u64, candidate: &str) -> AuthResult<bool> {
    let expected = generate_code(totp, counter)?;
    Ok(constant_time_eq(candidate.as_bytes(), expected.as_bytes()))
}

fn compute_hmac(algorithm: TotpAlgorithm, secret: &[u8], counter: u64) -> AuthResult<Vec<u8>> {
    let message = counter.to_be_bytes();

    macro_rules! digest {
        ($hash:ty) => {{
            let mut mac =
                Hmac::<$hash>::new_from_slice(secret).map_err(|e| AuthError::Internal {
                    message: e.to_string(),
                })?;
            mac.update(&message);
            mac.finalize().into_bytes().to_vec()
        }};
    }

    Ok(match algorithm {
        TotpAlgorithm::Sha1 => digest!(Sha1),
        TotpAlgorithm::Sha256 => digest!(Sha256),
        TotpAlgorithm::Sha512 => digest!(Sha512),
    })
}

fn truncate(digest: &[u8], digits: u8) -> u32 {
    let offset = (digest.last().unwrap_or(&0) & 0x0f) as usize;
    let code = u32::from_be_bytes([
        digest.get(offset).copied().unwrap_or(0) & 0x7f,
        digest.get(offset + 1).copied().unwrap_or(0),
        digest.get(offset + 2).copied().unwrap_or(0),
        digest.get(offset + 3).copied().unwrap_or(0),
    ]);
    // Digits are clamped at the builder, but a record deserialized from an
    // external cache backend bypasses it; 10^10 would overflow u32.
    code % 10_u32.pow(u32::from(digits.min(9)))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use authc_model::{PasswordToken, TotpCredential};

    use super::*;
    use crate::password::PasswordHasherService;

    fn current_counter(totp: &TotpCredential) -> u64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
        now.as_secs() / u64::from(totp.period_secs())
    }

    #[test]
    fn password_strategy_matches_correct_secret() {
        let hash = PasswordHasherService::with_defaults()
            .hash("vietnam")
            .unwrap();
        let record = CredentialRecord::new("walter", "accounts", hash);

        let strategy = PasswordStrategy;
        assert!(strategy
            .verify(&PasswordToken::new("walter", "vietnam"), &record)
            .unwrap());
        assert!(!strategy
            .verify(&PasswordToken::new("walter", "nam"), &record)
            .unwrap());
    }

    #[test]
    fn totp_strategy_accepts_current_code() {
        let totp = TotpCredential::new(b"shared secret".to_vec());
        let record =
            CredentialRecord::new("thedude", "accounts", "$argon2id$stub").with_totp(totp);

        let totp = record.totp().unwrap();
        let code = generate_code(totp, current_counter(totp)).unwrap();

        assert!(TotpStrategy
            .verify(&TotpToken::new("thedude", code), &record)
            .unwrap());
    }

    #[test]
    fn totp_strategy_accepts_previous_period_within_window() {
        let totp = TotpCredential::new(b"shared secret".to_vec());
        let record =
            CredentialRecord::new("thedude", "accounts", "$argon2id$stub").with_totp(totp);

        let totp = record.totp().unwrap();
        let code = generate_code(totp, current_counter(totp) - 1).unwrap();

        assert!(TotpStrategy
            .verify(&TotpToken::new("thedude", code), &record)
            .unwrap());
    }

    #[test]
    fn totp_strategy_rejects_wrong_code() {
        let totp = TotpCredential::new(b"shared secret".to_vec());
        let record =
            CredentialRecord::new("thedude", "accounts", "$argon2id$stub").with_totp(totp);

        // A code of the wrong length can never match a 6-digit credential.
        assert!(!TotpStrategy
            .verify(&TotpToken::new("thedude", "0000000"), &record)
            .unwrap());
    }

    #[test]
    fn totp_without_registration_never_matches() {
        let record = CredentialRecord::new("walter", "accounts", "$argon2id$stub");
        assert!(!TotpStrategy
            .verify(&TotpToken::new("walter", "123456"), &record)
            .unwrap());
    }

    #[test]
    fn generated_code_has_configured_length() {
        let totp = TotpCredential::new(b"secret".to_vec()).digits(8);
        let code = generate_code(&totp, 42).unwrap();
        assert_eq!(code.len(), 8);
    }

    #[test]
    fn oversized_digit_count_still_verifies() {
        let totp = TotpCredential::new(b"shared secret".to_vec()).digits(10);
        let record =
            CredentialRecord::new("thedude", "accounts", "$argon2id$stub").with_totp(totp);

        let totp = record.totp().unwrap();
        let code = generate_code(totp, current_counter(totp)).unwrap();
        assert_eq!(code.len(), 9);

        assert!(TotpStrategy
            .verify(&TotpToken::new("thedude", code), &record)
            .unwrap());
    }

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq(b"123456", b"123456"));
        assert!(!constant_time_eq(b"123456", b"123457"));
        assert!(!constant_time_eq(b"123456", b"12345"));
    }
}
