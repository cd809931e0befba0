//! Process configuration
//!
//! Parsed from command-line flags with environment variable fallbacks.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::types::DEFAULT_QUEUE_CAPACITY;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "signal_relay=info,tower_http=info";

/// Signaling relay server configuration
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "WebSocket signaling relay for peer-to-peer calls", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "SIGNAL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "SIGNAL_PORT", default_value_t = 7000)]
    pub port: u16,

    /// PEM certificate chain; enables TLS together with --tls-key
    #[arg(long, env = "SIGNAL_TLS_CERT")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key
    #[arg(long, env = "SIGNAL_TLS_KEY")]
    pub tls_key: Option<PathBuf>,

    /// Outbound frames a client may have pending before it is disconnected
    #[arg(long, env = "SIGNAL_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// tracing filter directives
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host address: {0}")]
    InvalidHost(String),

    #[error("--tls-cert and --tls-key must be given together")]
    IncompleteTls,

    #[error("queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("TLS file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

impl Config {
    /// Check cross-field constraints that clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }
        if let Some((cert, key)) = self.tls_paths()? {
            for path in [cert, key] {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Certificate and key paths, or `None` for plain transport
    pub fn tls_paths(&self) -> Result<Option<(&Path, &Path)>, ConfigError> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Ok(Some((cert.as_path(), key.as_path()))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteTls),
        }
    }
}
