//! Presence fan-out to every live WebSocket connection.

use super::{ConnectionHandle, ConnectionId, ConnectionRegistry, Identity};
use crate::metrics;
use crate::websocket::message_types::WsOutboundEvent;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Owns the live connection set and is the only writer of the registry.
///
/// Every effective binding change is followed by exactly one broadcast of the
/// full presence set. Mutation, snapshot and fan-out happen under one lock, so
/// the last snapshot any connection receives always matches the registry.
pub struct PresenceBroadcaster {
    registry: ConnectionRegistry,
    live: Mutex<HashMap<ConnectionId, ConnectionHandle>>,
}

impl PresenceBroadcaster {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            registry,
            live: Mutex::new(HashMap::new()),
        }
    }

    fn live(&self) -> MutexGuard<'_, HashMap<ConnectionId, ConnectionHandle>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register a newly authenticated connection and bind its identity.
    pub fn connect(&self, identity: Identity, handle: ConnectionHandle) {
        let mut live = self.live();
        let connection_id = handle.id();
        live.insert(connection_id, handle.clone());

        if let Some(superseded) = self.registry.bind(identity.clone(), handle) {
            info!(
                identity = %identity,
                connection_id = %connection_id,
                superseded_connection_id = %superseded.id(),
                "identity reconnected, previous connection superseded"
            );
        }

        self.publish(&mut live);
    }

    /// Forget a closed connection. Broadcasts only when its binding was still
    /// current; closing a superseded connection changes nothing.
    ///
    /// Returns the identity that went offline.
    pub fn disconnect(&self, connection_id: ConnectionId) -> Option<Identity> {
        let mut live = self.live();
        live.remove(&connection_id);

        let offline = self.registry.unbind(connection_id);
        match &offline {
            Some(identity) => {
                debug!(identity = %identity, connection_id = %connection_id, "identity went offline");
                self.publish(&mut live);
            }
            None => {
                metrics::set_live_connections(live.len());
            }
        }
        offline
    }

    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    /// Push the current presence set to every live connection, pruning any
    /// whose socket side is already gone. Their close event still unbinds them.
    fn publish(&self, live: &mut HashMap<ConnectionId, ConnectionHandle>) {
        let online_users = self.registry.snapshot();
        metrics::set_bound_identities(online_users.len());

        let event = WsOutboundEvent::OnlineUsers { online_users };
        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "failed to serialize presence snapshot");
                return;
            }
        };

        let before = live.len();
        live.retain(|id, conn| {
            let sent = conn.send(frame.clone());
            if !sent {
                debug!(connection_id = %id, "dropping dead connection from presence fan-out");
            }
            sent
        });

        metrics::record_presence_broadcast();
        metrics::set_live_connections(live.len());
        debug!(
            recipients = live.len(),
            pruned = before - live.len(),
            "broadcast presence snapshot"
        );
    }
}
