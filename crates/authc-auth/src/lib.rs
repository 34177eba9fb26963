//! # authc-auth
//!
//! Multi-factor authentication engine with attempt-tracking lockout,
//! credential caching and lifecycle events.
//!
//! The [`Authenticator`] is the sole entry point: callers drive a
//! multi-factor sequence by calling [`Authenticator::authenticate`]
//! repeatedly, threading the identity returned by a partial success back in
//! until full success or a terminal failure.
//!
//! ## Example
//!
//! ```ignore
//! use authc_auth::{Authenticator, AuthOutcome};
//! use authc_model::{PasswordToken, TotpToken};
//!
//! let outcome = engine
//!     .authenticate(None, PasswordToken::new("thedude", "nihilist").into())
//!     .await?;
//!
//! if let AuthOutcome::AdditionalFactorRequired(identity) = outcome {
//!     let outcome = engine
//!         .authenticate(Some(identity), TotpToken::new("thedude", code).into())
//!         .await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authenticator;
pub mod error;
pub mod lock;
pub mod password;
pub mod strategy;

pub use authenticator::{AuthOutcome, Authenticator};
pub use error::{AuthError, AuthResult};
pub use lock::{FailureOutcome, LockTracker};
pub use password::{PasswordHasherService, PasswordPolicy};
pub use strategy::{current_code, PasswordStrategy, TotpStrategy};
