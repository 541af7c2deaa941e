// Shared transport configuration for building tonic channels.
//
// Resolves the `host:port` target, selects transport security, and
// produces a lazily-connected `Channel`. Nothing here touches the network:
// the first call on the channel opens the connection.

use std::time::Duration;

use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use crate::error::Error;

/// Loopback host used when no host is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Well-known distributor port.
pub const DEFAULT_PORT: &str = "8081";

/// Default per-call deadline and connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Name sent in the user agent of every call.
pub const SDK_NAME: &str = "diode-sdk-rust";

/// Version sent in the user agent of every call.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transport security for the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// TLS with the platform's native trust roots. No pinning.
    #[default]
    System,
    /// Plaintext HTTP/2. Only selected when explicitly requested.
    Insecure,
}

/// Where and how to reach the distributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Distributor host, used verbatim.
    pub host: String,
    /// Distributor port, used verbatim.
    pub port: String,
    pub tls: TlsMode,
    /// Connect timeout and default per-call deadline.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT.into(),
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `diode-sdk-rust/<version>`, sent as the user agent on every call.
pub fn user_agent() -> String {
    format!("{SDK_NAME}/{SDK_VERSION}")
}

impl TransportConfig {
    /// The `host:port` target.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the endpoint URI for the configured security mode.
    fn uri(&self) -> String {
        let scheme = match self.tls {
            TlsMode::System => "https",
            TlsMode::Insecure => "http",
        };
        format!("{scheme}://{}", self.target())
    }

    /// Build a tonic `Endpoint` from this config.
    pub fn endpoint(&self) -> Result<Endpoint, Error> {
        let target = self.target();
        let mut endpoint = Endpoint::from_shared(self.uri())
            .map_err(|e| Error::InvalidTarget {
                target: target.clone(),
                reason: e.to_string(),
            })?
            .user_agent(user_agent())
            .map_err(|e| Error::InvalidTarget {
                target: target.clone(),
                reason: e.to_string(),
            })?
            .connect_timeout(self.timeout);

        if self.tls == TlsMode::System {
            let tls = ClientTlsConfig::new()
                .with_native_roots()
                .domain_name(self.host.clone());
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| Error::Tls(e.to_string()))?;
        }

        Ok(endpoint)
    }

    /// Build a lazily-connected channel.
    ///
    /// Must be called from within a tokio runtime: the channel spawns its
    /// background worker immediately.
    pub fn connect_lazy(&self) -> Result<Channel, Error> {
        let endpoint = self.endpoint()?;
        debug!(endpoint = %self.target(), tls = ?self.tls, "building lazy channel");
        Ok(endpoint.connect_lazy())
    }
}
