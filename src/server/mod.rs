//! Server bootstrap
//!
//! Binds the HTTP/WebSocket router on plain TCP or, when certificate and key
//! are configured, on TLS. Both modes stop gracefully on Ctrl+C or SIGTERM.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::http::create_router;
use crate::api::websocket::state::AppState;
use crate::config::{Config, ConfigError};
use crate::router::Hub;

/// How long open connections get to finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Result type for server startup
pub type ServerResult<T> = Result<T, ServerError>;

/// Process-level failures; the only fatal errors in the relay
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load TLS material: {0}")]
    Tls(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Validate the config and serve until a shutdown signal arrives
pub async fn run(config: Config) -> ServerResult<()> {
    config.validate()?;
    let addr = config.socket_addr()?;
    let state = AppState::with_queue_capacity(Hub::new(), config.queue_capacity);
    let app = create_router(Arc::new(state));

    match config.tls_paths()? {
        Some((cert, key)) => {
            tracing::info!(cert = %cert.display(), key = %key.display(), "loading TLS certificates");
            let tls = RustlsConfig::from_pem_file(cert, key)
                .await
                .map_err(ServerError::Tls)?;

            let handle = axum_server::Handle::new();
            let signal_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                signal_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            tracing::info!("signaling relay listening on wss://{}/ws", addr);
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!("signaling relay listening on ws://{}/ws", listener.local_addr()?);
            serve(listener, app, shutdown_signal()).await?;
        }
    }

    tracing::info!("server shut down");
    Ok(())
}

/// Serve `app` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
