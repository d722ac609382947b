//! Shared server state.

use std::sync::Arc;

use tokio::sync::Mutex;

use chitchat_shared::time::Clock;

use crate::registry::ConnectionRegistry;
use crate::store::MessageStore;

/// Mutable relay state: everything that lives behind the single lock.
#[derive(Default)]
pub struct RelayState {
    pub registry: ConnectionRegistry,
    pub store: MessageStore,
}

impl RelayState {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            store: MessageStore::new(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Registry and store share one lock: any two usernames may share a
    /// room, so mutations cannot be partitioned.
    pub relay: Mutex<RelayState>,
    /// Server-side clock for message timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            relay: Mutex::new(RelayState::new()),
            clock,
        }
    }
}
