//! Aggregate info fan-out and single-client sends

use crate::protocol::{InfoPayload, ServerMessage};
use crate::registry::Registry;
use crate::types::ClientId;

/// Recompute counts and send the same `server:info` frame to every client
pub fn publish_info(registry: &Registry) -> InfoPayload {
    let counts = registry.counts();
    let text = ServerMessage::Info(counts).to_text();

    for client in registry.iter() {
        if let Err(e) = client.channel.send(client.id, text.clone()) {
            tracing::debug!(error = %e, "info frame dropped");
        }
    }

    counts
}

/// Send one server message to one client; misses and closed channels are
/// logged and dropped
pub fn send_to(registry: &Registry, id: ClientId, message: &ServerMessage) {
    let result = registry
        .get(id)
        .and_then(|client| client.channel.send(id, message.to_text()));
    if let Err(e) = result {
        tracing::debug!(error = %e, "server message dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientChannel;

    #[test]
    fn test_publish_reaches_every_client() {
        let mut registry = Registry::new();
        let (ch_a, mut rx_a) = ClientChannel::pair();
        let (ch_b, mut rx_b) = ClientChannel::pair();
        let a = registry.register(ch_a);
        registry.register(ch_b);
        registry.get_mut(a).unwrap().ready = true;

        let counts = publish_info(&registry);
        assert_eq!(counts, InfoPayload { users: 2, ready_users: 1, connected_users: 0 });

        let expected = ServerMessage::Info(counts).to_text();
        assert_eq!(rx_a.try_recv().unwrap(), expected);
        assert_eq!(rx_b.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_publish_survives_closed_channel() {
        let mut registry = Registry::new();
        let (ch_a, rx_a) = ClientChannel::pair();
        let (ch_b, mut rx_b) = ClientChannel::pair();
        registry.register(ch_a);
        registry.register(ch_b);
        drop(rx_a);

        publish_info(&registry);
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_send_to_missing_client_is_dropped() {
        let registry = Registry::new();
        send_to(&registry, ClientId::new(), &ServerMessage::HangUp);
    }
}
