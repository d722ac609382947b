//! Real-time chat relay.
//!
//! Accepts persistent WebSocket connections authenticated by a claimed
//! username, tracks online presence, routes messages to the public
//! channel or to private two-user rooms, and maintains per-message
//! reaction state. All state is in-memory for the process lifetime.

pub mod error;
pub mod events;
pub mod handler;
pub mod presence;
pub mod reaction;
pub mod registry;
pub mod room;
pub mod runner;
mod signal;
pub mod state;
pub mod store;
