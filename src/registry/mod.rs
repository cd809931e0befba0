//! Connection registry
//!
//! The single source of truth for who is online, ready, or in a call. The
//! registry itself is not synchronized; the [`Hub`](crate::router::Hub) wraps
//! it in one mutex so every read-then-write sequence is atomic.

use std::collections::{BTreeSet, HashMap};

use crate::protocol::InfoPayload;
use crate::types::{Client, ClientChannel, ClientId, ClientSnapshot, RelayError, RelayResult};

/// Mapping from connection id to client state
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<ClientId, Client>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new client with a fresh id and default flags
    pub fn register(&mut self, channel: ClientChannel) -> ClientId {
        let mut id = ClientId::new();
        while self.clients.contains_key(&id) {
            id = ClientId::new();
        }
        self.clients.insert(id, Client::new(id, channel));
        id
    }

    /// Remove a client. Idempotent.
    ///
    /// If the client was paired, the surviving peer's link is cleared and its
    /// `connected` flag reset, so no entry ever points at a removed id.
    pub fn unregister(&mut self, id: ClientId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        if let Some(peer_id) = client.peer {
            if let Some(peer) = self.clients.get_mut(&peer_id) {
                if peer.peer == Some(id) {
                    peer.peer = None;
                    peer.connected = false;
                }
            }
        }
        Some(client)
    }

    /// Look up a client; a miss is reported as a stale reference
    pub fn get(&self, id: ClientId) -> RelayResult<&Client> {
        self.clients.get(&id).ok_or(RelayError::StaleReference(id))
    }

    pub fn get_mut(&mut self, id: ClientId) -> RelayResult<&mut Client> {
        self.clients.get_mut(&id).ok_or(RelayError::StaleReference(id))
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Ids that are ready, not connected and without a peer
    pub fn ready_unpaired(&self) -> BTreeSet<ClientId> {
        self.clients
            .values()
            .filter(|c| c.is_ready_unpaired())
            .map(|c| c.id)
            .collect()
    }

    /// Ready-unpaired ids other than `exclude` whose connection can still
    /// take frames, in id order
    pub fn pairing_candidates(&self, exclude: ClientId) -> Vec<ClientId> {
        let mut candidates: Vec<ClientId> = self
            .clients
            .values()
            .filter(|c| c.id != exclude && c.is_ready_unpaired() && !c.channel.is_closed())
            .map(|c| c.id)
            .collect();
        candidates.sort();
        candidates
    }

    pub fn connected_ids(&self) -> BTreeSet<ClientId> {
        self.clients
            .values()
            .filter(|c| c.connected)
            .map(|c| c.id)
            .collect()
    }

    pub fn counts(&self) -> InfoPayload {
        InfoPayload {
            users: self.clients.len(),
            ready_users: self.clients.values().filter(|c| c.is_ready_unpaired()).count(),
            connected_users: self.clients.values().filter(|c| c.connected).count(),
        }
    }

    /// Link two clients to each other
    pub fn link(&mut self, a: ClientId, b: ClientId) -> RelayResult<()> {
        if a == b {
            return Err(RelayError::SelfLink(a));
        }
        self.get(a)?;
        self.get(b)?;
        self.get_mut(a)?.peer = Some(b);
        self.get_mut(b)?.peer = Some(a);
        Ok(())
    }

    /// Clear `id`'s link and, if it points back, the peer's link too.
    /// Returns the former peer id.
    pub fn unlink(&mut self, id: ClientId) -> Option<ClientId> {
        let peer_id = self.clients.get_mut(&id)?.peer.take()?;
        if let Some(peer) = self.clients.get_mut(&peer_id) {
            if peer.peer == Some(id) {
                peer.peer = None;
            }
        }
        Some(peer_id)
    }

    pub fn snapshot(&self, id: ClientId) -> Option<ClientSnapshot> {
        self.clients.get(&id).map(Client::snapshot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Every peer link is symmetric and points at a present client
    pub fn links_consistent(&self) -> bool {
        self.clients.values().all(|c| match c.peer {
            None => true,
            Some(p) => self
                .clients
                .get(&p)
                .map(|peer| peer.peer == Some(c.id))
                .unwrap_or(false),
        })
    }
}
