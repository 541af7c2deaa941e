// ── Blocking client ──
//
// Owns a small tokio runtime and drives the async client on it, for callers
// without an async context of their own. Must not be used from inside
// another tokio runtime.

use tokio::runtime::{Builder, Runtime};

use diode_api::{CallOptions, ClientConfig};

use crate::error::CoreError;
use crate::model::{IngestRequest, IngestResponse};

/// Blocking ingestion client.
#[derive(Debug)]
pub struct DiodeClient {
    inner: crate::client::DiodeClient,
    runtime: Runtime,
}

impl DiodeClient {
    pub fn from_env() -> Result<Self, CoreError> {
        let config = diode_config::client_config_from_env()?;
        Self::new(&config)
    }

    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("diode-client")
            .enable_all()
            .build()?;
        let inner = {
            let _guard = runtime.enter();
            crate::client::DiodeClient::new(config)?
        };
        Ok(Self { inner, runtime })
    }

    pub fn target(&self) -> &str {
        self.inner.target()
    }

    /// Send one batch, blocking the calling thread until the response,
    /// a transport error, or the deadline.
    pub fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, CoreError> {
        self.runtime.block_on(self.inner.ingest(request))
    }

    pub fn ingest_with(
        &self,
        request: IngestRequest,
        options: CallOptions,
    ) -> Result<IngestResponse, CoreError> {
        self.runtime.block_on(self.inner.ingest_with(request, options))
    }

    /// Release the connection and shut the runtime down.
    pub fn close(self) -> Result<(), CoreError> {
        let Self { inner, runtime } = self;
        let result = inner.close();
        runtime.shutdown_background();
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use diode_api::{TlsMode, TransportConfig};
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn blocks_on_local_validation() {
        let config = ClientConfig {
            api_key: SecretString::from("k".to_owned()),
            transport: TransportConfig {
                port: "1".into(),
                tls: TlsMode::Insecure,
                timeout: Duration::from_millis(200),
                ..TransportConfig::default()
            },
        };
        let client = DiodeClient::new(&config).unwrap();
        assert_eq!(client.target(), "127.0.0.1:1");

        let err = client
            .ingest(IngestRequest::new("", "collector", "1.0.0"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        client.close().unwrap();
    }
}
