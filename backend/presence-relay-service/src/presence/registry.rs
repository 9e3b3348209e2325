use super::{ConnectionHandle, ConnectionId, Identity};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Bindings {
    // identity -> connection currently serving it
    by_identity: HashMap<Identity, ConnectionHandle>,
    // every connection that ever bound and has not closed yet, including superseded ones
    by_connection: HashMap<ConnectionId, Identity>,
}

/// Authoritative identity → connection map.
///
/// At most one binding per identity. A newer connection for the same identity
/// overwrites the older one; the older connection's later close is ignored
/// because `unbind` only removes a binding whose stored handle still matches.
///
/// The registry never performs I/O and never awaits, so every operation is a
/// single atomic step from the caller's point of view.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<Bindings>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Bindings> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Bindings> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `identity` to `handle`, overwriting any existing binding.
    ///
    /// Returns the superseded handle, if the identity was already bound to a
    /// different connection.
    pub fn bind(&self, identity: Identity, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let mut guard = self.write();

        // A connection serves one identity; drop what it served before.
        if let Some(previous) = guard.by_connection.insert(handle.id(), identity.clone()) {
            if previous != identity
                && guard
                    .by_identity
                    .get(&previous)
                    .is_some_and(|current| current.id() == handle.id())
            {
                guard.by_identity.remove(&previous);
            }
        }

        let superseded = guard
            .by_identity
            .insert(identity.clone(), handle.clone())
            .filter(|old| old.id() != handle.id());

        tracing::debug!(
            identity = %identity,
            connection_id = %handle.id(),
            superseded = ?superseded.as_ref().map(ConnectionHandle::id),
            bound = guard.by_identity.len(),
            "bound identity"
        );

        superseded
    }

    /// Release the binding held by connection `id`.
    ///
    /// Returns the identity that went offline, or `None` when the connection
    /// was never bound or had already been superseded by a newer connection.
    pub fn unbind(&self, id: ConnectionId) -> Option<Identity> {
        let mut guard = self.write();
        let identity = guard.by_connection.remove(&id)?;

        let still_current = guard
            .by_identity
            .get(&identity)
            .is_some_and(|current| current.id() == id);

        if !still_current {
            tracing::debug!(
                identity = %identity,
                connection_id = %id,
                "ignoring close of superseded connection"
            );
            return None;
        }

        guard.by_identity.remove(&identity);
        tracing::debug!(
            identity = %identity,
            connection_id = %id,
            bound = guard.by_identity.len(),
            "unbound identity"
        );
        Some(identity)
    }

    /// Current connection for `identity`, if it is online.
    pub fn resolve(&self, identity: &Identity) -> Option<ConnectionHandle> {
        self.read().by_identity.get(identity).cloned()
    }

    /// All bound identities. Sorted only to keep payloads stable; consumers
    /// must not rely on order.
    pub fn snapshot(&self) -> Vec<Identity> {
        let mut online: Vec<Identity> = self.read().by_identity.keys().cloned().collect();
        online.sort();
        online
    }

    pub fn bound_count(&self) -> usize {
        self.read().by_identity.len()
    }
}
