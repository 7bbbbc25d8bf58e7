//! The authoritative set of open WebSocket connections.
//!
//! [`ConnectionRegistry`] keeps every registered [`Connection`] in a
//! `HashMap` behind a [`tokio::sync::RwLock`]. A connection is a member
//! exactly while its state is `Open`: registration requires `Open`, and
//! removal performs the `Open → Closing` transition under the same write
//! lock, so a snapshot never observes a member that has already left.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Connection, ConnectionId, ConnectionState};

/// Registration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Only open connections may join the registry.
    #[error("connection {id} is {state}, expected open")]
    NotOpen {
        /// Rejected connection.
        id: ConnectionId,
        /// Its state at registration time.
        state: ConnectionState,
    },

    /// The connection is already a member.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),
}

/// Process-wide set of open connections.
///
/// Owned by the process host and shared through [`std::sync::Arc`]; it
/// starts empty and is emptied by [`ConnectionRegistry::clear`] on
/// shutdown.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an open connection. It is visible to the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotOpen`] if the connection has not
    /// completed its handshake or is already closing, and
    /// [`RegistryError::AlreadyRegistered`] on a duplicate.
    pub async fn register(&self, connection: Connection) -> Result<(), RegistryError> {
        let id = connection.id();
        let mut map = self.connections.write().await;
        let state = connection.state();
        if state != ConnectionState::Open {
            return Err(RegistryError::NotOpen { id, state });
        }
        if map.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        map.insert(id, connection);
        tracing::debug!(conn_id = %id, members = map.len(), "connection registered");
        Ok(())
    }

    /// Removes a connection and moves it out of `Open`.
    ///
    /// Idempotent: returns `false` when the connection was not a member.
    pub async fn unregister(&self, connection: &Connection) -> bool {
        let id = connection.id();
        let mut map = self.connections.write().await;
        let removed = map.remove(&id).is_some();
        connection.begin_close();
        if removed {
            tracing::debug!(conn_id = %id, members = map.len(), "connection unregistered");
        }
        removed
    }

    /// Returns the members present right now.
    ///
    /// The returned handles are independent of later registry changes;
    /// callers must still check each target's state before delivering.
    pub async fn snapshot(&self) -> Vec<Connection> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Unregisters every member, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut map = self.connections.write().await;
        let count = map.len();
        for (_, connection) in map.drain() {
            connection.begin_close();
        }
        count
    }

    /// Returns the number of members.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if there are no members.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
