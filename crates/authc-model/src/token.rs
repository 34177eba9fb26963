//! Authentication tokens.
//!
//! A token carries one submitted factor: the claimed identifier plus the
//! factor-specific secret. Tokens are immutable once constructed.

use std::fmt;

/// The kind of factor a token attempts to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    /// A password (first factor).
    Password,
    /// A time-based one-time password (second factor).
    Totp,
}

impl FactorKind {
    /// Returns the string representation used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Totp => "totp",
        }
    }

    /// Checks whether this factor can only continue an existing attempt.
    #[must_use]
    pub const fn is_second_factor(&self) -> bool {
        matches!(self, Self::Totp)
    }
}

/// A username/password token.
#[derive(Clone)]
pub struct PasswordToken {
    identifier: String,
    secret: String,
    remember_me: bool,
    host: Option<String>,
}

impl PasswordToken {
    /// Creates a new password token for the claimed identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            remember_me: false,
            host: None,
        }
    }

    /// Sets the remember-me flag.
    #[must_use]
    pub const fn remember_me(mut self, remember: bool) -> Self {
        self.remember_me = remember;
        self
    }

    /// Sets the origin host the token was submitted from.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The claimed identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The submitted password.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the caller asked to be remembered.
    #[must_use]
    pub const fn is_remember_me(&self) -> bool {
        self.remember_me
    }

    /// The origin host, if recorded.
    #[must_use]
    pub fn origin_host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

impl fmt::Debug for PasswordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordToken")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .field("host", &self.host)
            .finish()
    }
}

/// A time-based one-time password token.
#[derive(Clone)]
pub struct TotpToken {
    identifier: String,
    code: String,
    remember_me: bool,
    host: Option<String>,
}

impl TotpToken {
    /// Creates a new TOTP token for the claimed identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            code: code.into(),
            remember_me: false,
            host: None,
        }
    }

    /// Sets the remember-me flag.
    #[must_use]
    pub const fn remember_me(mut self, remember: bool) -> Self {
        self.remember_me = remember;
        self
    }

    /// Sets the origin host the token was submitted from.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The claimed identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The submitted one-time code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the caller asked to be remembered.
    #[must_use]
    pub const fn is_remember_me(&self) -> bool {
        self.remember_me
    }

    /// The origin host, if recorded.
    #[must_use]
    pub fn origin_host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

impl fmt::Debug for TotpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpToken")
            .field("identifier", &self.identifier)
            .field("code", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .field("host", &self.host)
            .finish()
    }
}

/// A submitted authentication factor.
///
/// The closed set of variants gives the engine compile-time exhaustive
/// dispatch to the matching verification strategy.
#[derive(Debug, Clone)]
pub enum Token {
    /// Password factor.
    Password(PasswordToken),
    /// TOTP factor.
    Totp(TotpToken),
}

impl Token {
    /// The claimed identifier carried by the token.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Password(t) => t.identifier(),
            Self::Totp(t) => t.identifier(),
        }
    }

    /// The factor kind this token attempts to satisfy.
    #[must_use]
    pub const fn kind(&self) -> FactorKind {
        match self {
            Self::Password(_) => FactorKind::Password,
            Self::Totp(_) => FactorKind::Totp,
        }
    }

    /// Checks whether this token can only continue an existing attempt.
    #[must_use]
    pub const fn is_second_factor(&self) -> bool {
        self.kind().is_second_factor()
    }
}

impl From<PasswordToken> for Token {
    fn from(token: PasswordToken) -> Self {
        Self::Password(token)
    }
}

impl From<TotpToken> for Token {
    fn from(token: TotpToken) -> Self {
        Self::Totp(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_token_is_first_factor() {
        let token = Token::from(PasswordToken::new("walter", "vietnam"));
        assert_eq!(token.kind(), FactorKind::Password);
        assert!(!token.is_second_factor());
        assert_eq!(token.identifier(), "walter");
    }

    #[test]
    fn totp_token_is_second_factor() {
        let token = Token::from(TotpToken::new("thedude", "123456"));
        assert_eq!(token.kind(), FactorKind::Totp);
        assert!(token.is_second_factor());
    }

    #[test]
    fn debug_redacts_secrets() {
        let token = PasswordToken::new("walter", "vietnam").host("127.0.0.1");
        let rendered = format!("{token:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("vietnam"));

        let token = TotpToken::new("thedude", "123456");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("123456"));
    }

    #[test]
    fn builder_flags() {
        let token = PasswordToken::new("walter", "vietnam")
            .remember_me(true)
            .host("10.0.0.1");
        assert!(token.is_remember_me());
        assert_eq!(token.origin_host(), Some("10.0.0.1"));
    }
}
