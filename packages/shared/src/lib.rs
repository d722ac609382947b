//! Shared utilities for the Chitchat relay.
//!
//! Logging setup and clock abstractions used by the server and its tests.

pub mod logger;
pub mod time;
