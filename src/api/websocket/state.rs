//! WebSocket application state

use crate::router::Hub;
use crate::types::DEFAULT_QUEUE_CAPACITY;

/// Shared application state for WebSocket connections
pub struct AppState {
    /// Registry, pairing and routing
    pub hub: Hub,

    /// Outbound frames a connection may have pending before it is dropped
    pub queue_capacity: usize,
}

impl AppState {
    pub fn new(hub: Hub) -> Self {
        Self::with_queue_capacity(hub, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(hub: Hub, queue_capacity: usize) -> Self {
        Self {
            hub,
            queue_capacity: queue_capacity.max(1),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Hub::new())
    }
}
