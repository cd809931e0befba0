//! Signaling relay for peer-to-peer calls
//!
//! Accepts WebSocket connections, tracks each client's readiness, pairs ready
//! clients into calls and relays WebRTC negotiation messages (offers, answers,
//! ICE candidates) between the two sides of a call. Media never passes
//! through the relay.
//!
//! # Modules
//!
//! - `types`: Client record, ids, outbound channel, errors
//! - `protocol`: JSON envelope types for both directions
//! - `registry`: In-memory directory of connected clients
//! - `pairing`: Partner selection and peer linking
//! - `router`: Per-event dispatch and the `server:info` broadcast
//! - `api`: axum routes and the WebSocket connection loop
//! - `config`: Command-line / environment configuration
//! - `server`: Listener bootstrap (plain or TLS) and graceful shutdown
//!
//! # Example
//!
//! ```
//! use signal_relay::{ClientChannel, Hub};
//!
//! let hub = Hub::new();
//! let (channel, mut rx) = ClientChannel::pair();
//! let id = hub.connect(channel);
//! hub.handle_text(id, r#"{"type":"client:ready"}"#);
//!
//! assert_eq!(hub.counts().ready_users, 1);
//! assert!(rx.try_recv().is_ok()); // server:info
//! ```

pub mod api;
pub mod config;
pub mod pairing;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod types;

// Re-export commonly used items at crate root
pub use pairing::{PeerSelector, RandomSelector, SeededSelector};
pub use protocol::{ClientMessage, InfoPayload, RelayKind, ServerMessage};
pub use registry::Registry;
pub use router::Hub;
pub use types::{Client, ClientChannel, ClientId, ClientReceiver, ClientSnapshot, RelayError, RelayResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
