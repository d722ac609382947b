//! Presence broadcasting.
//!
//! The online set is derived from the connection registry on every
//! change and pushed to all clients as a full snapshot, never a diff.

use crate::events::OnlineUsersEvent;
use crate::registry::ConnectionRegistry;

/// Build the presence snapshot event from the registry.
pub fn online_users_event(registry: &ConnectionRegistry) -> OnlineUsersEvent {
    OnlineUsersEvent::new(registry.online_users())
}

/// Broadcast the current online-user snapshot to every connected client.
pub fn broadcast_online_users(registry: &ConnectionRegistry) {
    let event = online_users_event(registry);
    tracing::debug!("Broadcasting online users: {:?}", event.users);
    let payload = serde_json::to_string(&event).unwrap();
    registry.broadcast_all(&payload);
}
