//! Wire protocol for the signaling relay
//!
//! All frames are UTF-8 JSON text with a `{ type, payload? }` envelope.

mod messages;

pub use messages::{ClientMessage, InfoPayload, RelayKind, ServerMessage};
