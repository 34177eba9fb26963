//! # authc-model
//!
//! Domain model for the authc authentication engine.
//!
//! This crate defines the data types exchanged between the engine and its
//! collaborators:
//!
//! - [`Token`] — one submitted authentication factor (password, TOTP code)
//! - [`AccountIdentity`] — the resolved principal returned on partial or
//!   full success
//! - [`CredentialRecord`] — the per-account credential material sourced from
//!   the account store or the credential cache

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod identity;
pub mod token;

pub use credential::{CredentialRecord, TotpAlgorithm, TotpCredential};
pub use identity::{AccountIdentity, RealmIdentifier};
pub use token::{FactorKind, PasswordToken, Token, TotpToken};
