//! WebSocket signaling endpoint
//!
//! Each connection is registered with the hub on upgrade, fed inbound text
//! frames, and unregistered when either direction of the socket ends.

pub mod handler;
pub mod state;
