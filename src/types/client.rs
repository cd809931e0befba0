//! Client record kept by the registry

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::{TryRecvError, TrySendError}};
use tokio::sync::Notify;
use uuid::Uuid;

use super::error::{RelayError, RelayResult};

/// Opaque identifier assigned to a connection when it opens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Frames a connection may have queued before it counts as stalled
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Outbound half of a client connection.
///
/// Sends are fire-and-forget: a successful `send` only means the frame was
/// queued for the connection's writer task, not that the peer received it.
/// The queue is bounded; a full queue fails the send and tells the receiver
/// to shut the connection down.
#[derive(Clone, Debug)]
pub struct ClientChannel {
    tx: mpsc::Sender<String>,
    overflow: Arc<Notify>,
}

impl ClientChannel {
    /// Create a channel with the default queue capacity together with the
    /// receiver its writer drains
    pub fn pair() -> (Self, ClientReceiver) {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, ClientReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let overflow = Arc::new(Notify::new());
        let channel = Self {
            tx,
            overflow: overflow.clone(),
        };
        (channel, ClientReceiver { rx, overflow })
    }

    /// Queue a text frame for delivery
    pub fn send(&self, id: ClientId, text: String) -> RelayResult<()> {
        match self.tx.try_send(text) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.overflow.notify_one();
                Err(RelayError::ChannelClosed(id))
            }
            Err(TrySendError::Closed(_)) => Err(RelayError::ChannelClosed(id)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half drained by the connection's writer
#[derive(Debug)]
pub struct ClientReceiver {
    rx: mpsc::Receiver<String>,
    overflow: Arc<Notify>,
}

impl ClientReceiver {
    /// Next queued frame. `None` once every sender is gone or the queue
    /// overflowed; either way the connection should be closed.
    pub async fn recv(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            _ = self.overflow.notified() => None,
            frame = self.rx.recv() => frame,
        }
    }

    pub fn try_recv(&mut self) -> Result<String, TryRecvError> {
        self.rx.try_recv()
    }
}

/// One entry per open connection
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub channel: ClientChannel,
    /// Wants to be paired
    pub ready: bool,
    /// Currently in an active call
    pub connected: bool,
    /// Id of the paired client, kept symmetric by the registry
    pub peer: Option<ClientId>,
    /// Unix timestamp of the connection
    pub connected_at: i64,
}

impl Client {
    pub fn new(id: ClientId, channel: ClientChannel) -> Self {
        Self {
            id,
            channel,
            ready: false,
            connected: false,
            peer: None,
            connected_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Ready, not in a call, and not linked to anyone
    pub fn is_ready_unpaired(&self) -> bool {
        self.ready && !self.connected && self.peer.is_none()
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            id: self.id,
            ready: self.ready,
            connected: self.connected,
            peer: self.peer,
        }
    }
}

/// Copy of a client's state without its channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClientSnapshot {
    pub id: ClientId,
    pub ready: bool,
    pub connected: bool,
    pub peer: Option<ClientId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let (channel, _rx) = ClientChannel::pair();
        let client = Client::new(ClientId::new(), channel);

        assert!(!client.ready);
        assert!(!client.connected);
        assert!(client.peer.is_none());
        assert!(!client.is_ready_unpaired());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ClientId::new(), ClientId::new());
    }

    #[test]
    fn test_send_after_receiver_dropped_fails() {
        let id = ClientId::new();
        let (channel, rx) = ClientChannel::pair();
        drop(rx);

        assert!(channel.is_closed());
        assert!(matches!(
            channel.send(id, "x".to_string()),
            Err(RelayError::ChannelClosed(closed)) if closed == id
        ));
    }

    #[tokio::test]
    async fn test_full_queue_fails_send_and_ends_receiver() {
        let id = ClientId::new();
        let (channel, mut rx) = ClientChannel::with_capacity(2);

        assert!(channel.send(id, "1".to_string()).is_ok());
        assert!(channel.send(id, "2".to_string()).is_ok());
        assert!(matches!(
            channel.send(id, "3".to_string()),
            Err(RelayError::ChannelClosed(full)) if full == id
        ));

        // Queued frames are abandoned; the writer is told to close instead
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_receiver_delivers_in_order() {
        let id = ClientId::new();
        let (channel, mut rx) = ClientChannel::with_capacity(4);
        channel.send(id, "a".to_string()).unwrap();
        channel.send(id, "b".to_string()).unwrap();
        drop(channel);

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
        assert_eq!(rx.recv().await, None);
    }
}
