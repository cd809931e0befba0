//! Pairing engine
//!
//! Turns a ready client into the initiator of a call with a randomly chosen
//! ready-unpaired partner.

mod selector;

pub use selector::{PeerSelector, RandomSelector, SeededSelector};

use crate::protocol::ServerMessage;
use crate::registry::Registry;
use crate::types::ClientId;

/// Try to pair `id` with another ready-unpaired client.
///
/// Must run under the registry lock so that candidate selection and linking
/// happen as one step. Only the initiator is told about the call; the
/// partner learns of it from the initiator's offer.
///
/// Returns the chosen partner, or `None` when no pairing took place.
pub fn try_pair(
    registry: &mut Registry,
    id: ClientId,
    selector: &dyn PeerSelector,
) -> Option<ClientId> {
    let initiator = registry.get(id).ok()?;
    if !initiator.is_ready_unpaired() {
        return None;
    }

    let candidates = registry.pairing_candidates(id);
    if candidates.is_empty() {
        return None;
    }

    let partner = selector.select(&candidates)?;
    if !candidates.contains(&partner) {
        tracing::warn!(client = %id, partner = %partner, "selector returned a non-candidate");
        return None;
    }

    registry.link(id, partner).ok()?;
    tracing::info!(initiator = %id, partner = %partner, "paired clients");

    if let Ok(initiator) = registry.get(id) {
        if let Err(e) = initiator.channel.send(id, ServerMessage::Call.to_text()) {
            tracing::debug!(error = %e, "call notification dropped");
        }
    }

    Some(partner)
}
