//! HTTP server setup with Axum

use std::sync::Arc;
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::protocol::InfoPayload;
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Browsers connect from arbitrary front-end origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Signaling endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        .route("/api/stats", get(stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Current counts, same shape as the `server:info` payload
async fn stats(State(state): State<Arc<AppState>>) -> Json<InfoPayload> {
    Json(state.hub.counts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Hub;
    use crate::types::ClientChannel;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState::new(Hub::new()));
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_stats_reflects_registry() {
        let state = Arc::new(AppState::new(Hub::new()));
        let (channel, _rx) = ClientChannel::pair();
        let id = state.hub.connect(channel);
        state.hub.handle_text(id, r#"{"type":"client:ready"}"#);

        let app = create_router(state);
        let response = app
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: InfoPayload = serde_json::from_slice(&body).unwrap();
        assert_eq!(info, InfoPayload { users: 1, ready_users: 1, connected_users: 0 });
    }
}
