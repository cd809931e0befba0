//! Error taxonomy for the relay core

use thiserror::Error;

use super::client::ClientId;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Recoverable conditions raised by the core.
///
/// None of these are fatal: the router logs them and drops the action.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A peer id that has already left the registry
    #[error("stale peer reference: {0}")]
    StaleReference(ClientId),

    /// The acting connection itself is not registered
    #[error("unknown client: {0}")]
    UnknownClient(ClientId),

    /// Frame is not a recognizable envelope
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Attempt to link a client to itself
    #[error("cannot pair client {0} with itself")]
    SelfLink(ClientId),

    /// The connection's writer has gone away or fell too far behind
    #[error("channel closed for client {0}")]
    ChannelClosed(ClientId),
}
