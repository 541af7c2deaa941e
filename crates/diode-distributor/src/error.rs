use std::net::SocketAddr;

use thiserror::Error;

use diode_config::ConfigError;

#[derive(Debug, Error)]
pub enum DistributorError {
    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("distributor is already bound")]
    AlreadyBound,

    #[error("distributor must be bound before serving")]
    NotBound,

    #[error("distributor state is no longer observable")]
    Detached,

    // ── Setup ────────────────────────────────────────────────────────
    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("reflection setup failed: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("server error: {0}")]
    Serve(#[source] tonic::transport::Error),
}
