//! # authc-core
//!
//! Shared infrastructure for the authc authentication engine: the
//! configuration surface consumed by the engine and the event channel it
//! publishes authentication lifecycle events on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::AuthcConfig;
pub use error::ConfigError;
pub use event::{AuthenticationEvent, EventBus, EventTopic, InProcessEventBus};
