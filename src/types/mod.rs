//! Data types for the signaling relay
//!
//! This module contains the client record, its identifier, and the error
//! taxonomy shared by the registry, pairing engine and router.

mod client;
mod error;

pub use client::{
    Client, ClientChannel, ClientId, ClientReceiver, ClientSnapshot, DEFAULT_QUEUE_CAPACITY,
};
pub use error::{RelayError, RelayResult};
