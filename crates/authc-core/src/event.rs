//! Authentication lifecycle events.
//!
//! The engine publishes one named event at every decision point. Publication
//! is synchronous and fire-and-forget: the engine makes no delivery
//! guarantees and a subscriber can never fail an authentication outcome.
//! Subscribers should be lightweight and must not panic.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topics the engine publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventTopic {
    /// A factor was verified but more factors are required.
    Progress,
    /// Full authentication succeeded.
    Succeeded,
    /// A factor failed verification.
    Failed,
    /// The claimed identifier has no backing record.
    AccountNotFound,
    /// The account is locked, or this attempt crossed the lock threshold.
    AccountLocked,
}

impl EventTopic {
    /// Returns the fully qualified topic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "AUTHENTICATION.PROGRESS",
            Self::Succeeded => "AUTHENTICATION.SUCCEEDED",
            Self::Failed => "AUTHENTICATION.FAILED",
            Self::AccountNotFound => "AUTHENTICATION.ACCOUNT_NOT_FOUND",
            Self::AccountLocked => "AUTHENTICATION.ACCOUNT_LOCKED",
        }
    }
}

impl fmt::Display for EventTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authentication lifecycle event.
///
/// The payload is the subject identifier, for correlation with the failure
/// the caller observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
    /// The topic the event was published on.
    pub topic: EventTopic,
    /// The subject identifier.
    pub identifier: String,
}

impl AuthenticationEvent {
    /// Creates a new event for the subject identifier.
    #[must_use]
    pub fn new(topic: EventTopic, identifier: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            topic,
            identifier: identifier.into(),
        }
    }
}

/// Publish side of the event channel.
///
/// Injected into the engine at construction so tests can substitute a
/// recording implementation.
pub trait EventBus: Send + Sync {
    /// Publishes an event to all subscribers of its topic.
    fn publish(&self, event: AuthenticationEvent);
}

type Subscriber = Box<dyn Fn(&AuthenticationEvent) + Send + Sync>;

/// In-process synchronous event bus.
///
/// Subscribers are invoked on the publishing thread, in registration order.
#[derive(Default)]
pub struct InProcessEventBus {
    subscribers: RwLock<HashMap<EventTopic, Vec<Subscriber>>>,
}

impl InProcessEventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for a topic.
    pub fn subscribe<F>(&self, topic: EventTopic, subscriber: F)
    where
        F: Fn(&AuthenticationEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .entry(topic)
            .or_default()
            .push(Box::new(subscriber));
    }

    /// Returns the number of subscribers registered for a topic.
    #[must_use]
    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.subscribers
            .read()
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for InProcessEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessEventBus").finish_non_exhaustive()
    }
}

impl EventBus for InProcessEventBus {
    fn publish(&self, event: AuthenticationEvent) {
        tracing::trace!(topic = %event.topic, identifier = %event.identifier, "publishing event");

        let subscribers = self.subscribers.read();
        if let Some(handlers) = subscribers.get(&event.topic) {
            for handler in handlers {
                handler(&event);
            }
        }
    }
}
