//! Connection registry: binds live connections to claimed usernames.
//!
//! Invariant: at most one live connection per username. Binding an
//! already-bound username evicts the previous connection before the new
//! entry is installed, so there is no window where two connections share
//! a username.

use std::collections::HashMap;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::BindError;

/// Identifier for one live WebSocket connection.
pub type ConnectionId = Uuid;

/// Live connection state for one bound username.
#[derive(Debug)]
pub struct ClientHandle {
    pub connection_id: ConnectionId,
    /// Outbound channel into the connection's socket pump task.
    sender: mpsc::UnboundedSender<String>,
    /// Room key of the private room this connection is currently in, if any.
    pub active_room: Option<String>,
}

/// Map of username to their live connection handle.
#[derive(Default)]
pub struct ConnectionRegistry {
    clients: HashMap<String, ClientHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Bind a connection to a claimed username.
    ///
    /// Returns the evicted handle when the username was already bound;
    /// dropping it closes the old connection's outbound channel, which
    /// tears that connection down.
    pub fn bind(
        &mut self,
        connection_id: ConnectionId,
        username: &str,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<Option<ClientHandle>, BindError> {
        if username.is_empty() {
            return Err(BindError::EmptyUsername);
        }

        let evicted = self.clients.remove(username);
        self.clients.insert(
            username.to_string(),
            ClientHandle {
                connection_id,
                sender,
                active_room: None,
            },
        );
        Ok(evicted)
    }

    /// Remove the binding for `username`, but only while it still belongs
    /// to `connection_id`. A disconnect racing a forced replacement is a
    /// no-op. Returns whether an entry was removed.
    pub fn unbind(&mut self, username: &str, connection_id: ConnectionId) -> bool {
        match self.clients.get(username) {
            Some(handle) if handle.connection_id == connection_id => {
                self.clients.remove(username);
                true
            }
            _ => false,
        }
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.clients.contains_key(username)
    }

    /// Snapshot of currently bound usernames, sorted for consistent ordering.
    pub fn online_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.clients.keys().cloned().collect();
        users.sort();
        users
    }

    /// Replace the connection's private-room subscription. A connection
    /// belongs to at most one room at a time, so this is a full switch.
    pub fn set_active_room(&mut self, username: &str, room: Option<String>) {
        if let Some(handle) = self.clients.get_mut(username) {
            handle.active_room = room;
        }
    }

    /// Send a payload to one bound username. Returns whether the payload
    /// was handed to a live connection.
    pub fn send_to(&self, username: &str, payload: &str) -> bool {
        match self.clients.get(username) {
            Some(handle) => {
                if handle.sender.send(payload.to_string()).is_err() {
                    tracing::warn!("Failed to send to client '{}'", username);
                    return false;
                }
                true
            }
            None => false,
        }
    }

    /// Send a payload to every connected client.
    pub fn broadcast_all(&self, payload: &str) {
        for (username, handle) in self.clients.iter() {
            if handle.sender.send(payload.to_string()).is_err() {
                tracing::warn!("Failed to send to client '{}'", username);
            }
        }
    }

    /// Send a payload to every connection subscribed to `room`.
    pub fn broadcast_room(&self, room: &str, payload: &str) {
        for (username, handle) in self.clients.iter() {
            if handle.active_room.as_deref() == Some(room)
                && handle.sender.send(payload.to_string()).is_err()
            {
                tracing::warn!("Failed to send to client '{}'", username);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
