//! Connection presence: who is online, and through which socket.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `registry` | identity → live connection bindings (last-connect-wins) |
//! | `broadcaster` | live connection set, presence fan-out on every binding change |

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

pub mod broadcaster;
pub mod registry;

pub use broadcaster::PresenceBroadcaster;
pub use registry::ConnectionRegistry;

/// Stable principal id issued by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier of one live WebSocket connection.
///
/// Generated on connect and never reused, so a stale close event can always
/// be told apart from the connection that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound side of a live connection: its id plus the channel feeding the
/// socket writer. Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: UnboundedSender<String>,
}

impl ConnectionHandle {
    /// Create a handle with a fresh id, returning the receiving end that the
    /// socket writer drains.
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (sender, rx) = unbounded_channel();
        (
            Self {
                id: ConnectionId::new(),
                sender,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text frame. Returns false when the socket side is gone.
    pub fn send(&self, frame: String) -> bool {
        self.sender.send(frame).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        let (a, _rx_a) = ConnectionHandle::channel();
        let (b, _rx_b) = ConnectionHandle::channel();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn send_fails_once_receiver_dropped() {
        let (handle, rx) = ConnectionHandle::channel();
        assert!(handle.send("hello".into()));
        drop(rx);
        assert!(handle.is_closed());
        assert!(!handle.send("lost".into()));
    }

    #[test]
    fn identity_serializes_as_plain_string() {
        let identity = Identity::from("alice");
        assert_eq!(serde_json::to_string(&identity).unwrap(), "\"alice\"");
        assert_eq!(identity.to_string(), "alice");
    }
}
