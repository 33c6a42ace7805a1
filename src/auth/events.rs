//! Session event broadcasting
//!
//! Sign-in changes and forced navigation are published on a broadcast
//! channel so any front end (the CLI, an embedding UI, tests) can react.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Route of the sign-in entry point
pub const SIGN_IN_ROUTE: &str = "/login";

// =============================================================================
// EVENT TYPES
// =============================================================================

/// Events emitted by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// A fresh credential was accepted
    SignedIn { username: String },
    /// The user logged out explicitly
    SignedOut,
    /// The front end must move to `route`
    Navigate { route: String },
}

/// Receives the session layer's side effects.
///
/// `navigate` is the only required hook; it is where the user is sent when a
/// session ends.
pub trait SessionObserver: Send + Sync {
    fn navigate(&self, route: &str);

    fn signed_in(&self, _username: &str) {}

    fn signed_out(&self) {}
}

// =============================================================================
// EVENT BROADCASTER
// =============================================================================

/// Broadcasts session events to all subscribers
#[derive(Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a new broadcaster with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event to all subscribers
    /// Returns the number of receivers that received the event
    pub fn broadcast(&self, event: SessionEvent) -> usize {
        // send() returns Err if there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl SessionObserver for SessionEvents {
    fn navigate(&self, route: &str) {
        self.broadcast(SessionEvent::Navigate {
            route: route.to_string(),
        });
    }

    fn signed_in(&self, username: &str) {
        self.broadcast(SessionEvent::SignedIn {
            username: username.to_string(),
        });
    }

    fn signed_out(&self) {
        self.broadcast(SessionEvent::SignedOut);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
