//! Error types for the relay core.

use thiserror::Error;

/// Errors from binding a connection to a claimed username.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The client claimed no username, or an empty one. The connection
    /// is rejected before any state is created.
    #[error("missing or empty username")]
    EmptyUsername,
}
