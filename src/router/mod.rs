//! Message router
//!
//! [`Hub`] owns the registry behind a single mutex and applies each
//! connection event to it: lifecycle (connect/disconnect), state messages
//! (`client:*`) and relay messages (`webrtc:*`). Every event takes the lock
//! once, so pairing and the info broadcast that follows it see one
//! consistent registry.

mod publisher;

pub use publisher::{publish_info, send_to};

use parking_lot::Mutex;

use crate::pairing::{try_pair, PeerSelector, RandomSelector};
use crate::protocol::{ClientMessage, InfoPayload, RelayKind, ServerMessage};
use crate::registry::Registry;
use crate::types::{Client, ClientChannel, ClientId, ClientSnapshot, RelayError, RelayResult};

/// Shared relay state: the registry plus the partner selection strategy
pub struct Hub {
    registry: Mutex<Registry>,
    selector: Box<dyn PeerSelector>,
}

impl Hub {
    /// Hub with uniform random partner selection
    pub fn new() -> Self {
        Self::with_selector(RandomSelector)
    }

    pub fn with_selector(selector: impl PeerSelector + 'static) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            selector: Box::new(selector),
        }
    }

    /// Register a newly opened connection and announce the new counts
    pub fn connect(&self, channel: ClientChannel) -> ClientId {
        let mut registry = self.registry.lock();
        let id = registry.register(channel);
        tracing::info!(client = %id, users = registry.len(), "client connected");
        publish_info(&registry);
        id
    }

    /// Remove a closed connection. Safe to call more than once.
    pub fn disconnect(&self, id: ClientId) {
        let mut registry = self.registry.lock();
        let Some(client) = registry.unregister(id) else {
            return;
        };

        let session_secs = chrono::Utc::now().timestamp() - client.connected_at;
        tracing::info!(client = %id, session_secs, "client disconnected");

        if let Some(peer_id) = client.peer {
            if registry.contains(peer_id) {
                send_to(&registry, peer_id, &ServerMessage::HangUp);
            }
        }
        publish_info(&registry);
    }

    /// Handle one inbound text frame. Malformed frames are ignored.
    pub fn handle_text(&self, id: ClientId, text: &str) {
        match ClientMessage::parse(text) {
            Ok(message) => self.dispatch(id, &message, text),
            Err(e) => tracing::debug!(client = %id, error = %e, "ignoring frame"),
        }
    }

    /// Apply a parsed message; `raw` is what gets relayed for `webrtc:*`
    pub fn dispatch(&self, id: ClientId, message: &ClientMessage, raw: &str) {
        let mut registry = self.registry.lock();
        let result = match message {
            ClientMessage::Ready => self.mark_ready(&mut registry, id),
            ClientMessage::NotReady => Self::set_flag(&mut registry, id, |c| c.ready = false),
            ClientMessage::Connected => Self::set_flag(&mut registry, id, |c| c.connected = true),
            ClientMessage::NotConnected => self.mark_not_connected(&mut registry, id),
            ClientMessage::Relay(kind) => Self::relay(&registry, id, *kind, raw),
            ClientMessage::Unknown(msg_type) => {
                tracing::debug!(client = %id, msg_type = %msg_type, "ignoring unknown type");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::debug!(client = %id, error = %e, "dropped action");
        }
    }

    fn mark_ready(&self, registry: &mut Registry, id: ClientId) -> RelayResult<()> {
        registry.get_mut(id).map_err(|_| RelayError::UnknownClient(id))?.ready = true;
        try_pair(registry, id, self.selector.as_ref());
        publish_info(registry);
        Ok(())
    }

    fn set_flag(
        registry: &mut Registry,
        id: ClientId,
        apply: impl FnOnce(&mut Client),
    ) -> RelayResult<()> {
        apply(registry.get_mut(id).map_err(|_| RelayError::UnknownClient(id))?);
        publish_info(registry);
        Ok(())
    }

    /// Hang up the current call and put the caller back into pairing.
    ///
    /// The peer keeps its link until after the re-pair attempt, so the pair
    /// that just ended cannot be formed again by it.
    fn mark_not_connected(&self, registry: &mut Registry, id: ClientId) -> RelayResult<()> {
        let client = registry.get_mut(id).map_err(|_| RelayError::UnknownClient(id))?;
        let Some(peer_id) = client.peer.take() else {
            tracing::debug!(client = %id, "not_connected without a peer");
            return Ok(());
        };
        client.connected = false;

        let peer_present = registry.contains(peer_id);
        if peer_present {
            send_to(registry, peer_id, &ServerMessage::HangUp);
            tracing::info!(client = %id, peer = %peer_id, "call ended");
        }

        try_pair(registry, id, self.selector.as_ref());

        if peer_present {
            let peer = registry.get_mut(peer_id)?;
            if peer.peer == Some(id) {
                peer.peer = None;
            }
            peer.connected = false;
        }

        publish_info(registry);
        if peer_present {
            Ok(())
        } else {
            Err(RelayError::StaleReference(peer_id))
        }
    }

    /// Forward the raw frame to the peer, unchanged
    fn relay(registry: &Registry, id: ClientId, kind: RelayKind, raw: &str) -> RelayResult<()> {
        let client = registry.get(id).map_err(|_| RelayError::UnknownClient(id))?;
        let Some(peer_id) = client.peer else {
            tracing::debug!(client = %id, ?kind, "relay without a peer");
            return Ok(());
        };

        let peer = registry.get(peer_id)?;
        peer.channel.send(peer_id, raw.to_string())
    }

    pub fn counts(&self) -> InfoPayload {
        self.registry.lock().counts()
    }

    pub fn snapshot(&self, id: ClientId) -> Option<ClientSnapshot> {
        self.registry.lock().snapshot(id)
    }

    pub fn client_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Run a read-only closure against the registry
    pub fn inspect<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.registry.lock())
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
