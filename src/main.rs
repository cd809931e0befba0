//! Signaling relay server - binary entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use signal_relay::config::{Config, DEFAULT_LOG_FILTER};
use signal_relay::server;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting {} v{}", signal_relay::NAME, signal_relay::VERSION);

    if let Err(e) = server::run(config).await {
        tracing::error!("server failed: {}", e);
        std::process::exit(1);
    }
}
