//! API module for HTTP and WebSocket endpoints
//!
//! This module adapts the relay [`Hub`](crate::router::Hub) to axum: the
//! `/ws` signaling endpoint plus small health and stats routes.

pub mod websocket;
pub mod http;
