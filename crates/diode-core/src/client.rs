// ── SDK client facade ──
//
// Domain-typed wrapper over `diode_api::IngesterClient`. Requests are
// validated locally before they are sent; a request that breaks the schema
// never reaches the network.

use tracing::{debug, warn};

use diode_api::{CallOptions, ClientConfig, IngesterClient};

use crate::error::CoreError;
use crate::model::{IngestRequest, IngestResponse};

/// Async ingestion client.
///
/// Clones share one connection and may be used concurrently.
#[derive(Debug, Clone)]
pub struct DiodeClient {
    inner: IngesterClient,
}

impl DiodeClient {
    /// Build a client from `DIODE_*` environment variables.
    ///
    /// Does not connect; must be called inside a tokio runtime.
    pub fn from_env() -> Result<Self, CoreError> {
        let config = diode_config::client_config_from_env()?;
        Self::new(&config)
    }

    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self {
            inner: IngesterClient::new(config)?,
        })
    }

    pub fn target(&self) -> &str {
        self.inner.target()
    }

    /// Validate and send one batch with the default deadline.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, CoreError> {
        self.ingest_with(request, CallOptions::default()).await
    }

    /// Validate and send one batch with a per-call deadline or cancellation.
    ///
    /// `Ok` with a non-empty `errors` list means the distributor received the
    /// batch and rejected some or all of it.
    pub async fn ingest_with(
        &self,
        request: IngestRequest,
        options: CallOptions,
    ) -> Result<IngestResponse, CoreError> {
        if let Err(errors) = request.validate() {
            warn!(id = %request.id, violations = errors.len(), "request rejected locally");
            return Err(CoreError::Validation { errors });
        }

        let id = request.id.clone();
        let entities = request.entities.len();
        let response: IngestResponse = self.inner.ingest_with(request.into(), options).await?.into();

        if response.is_accepted() {
            debug!(%id, entities, "batch accepted");
        } else {
            warn!(%id, errors = response.errors.len(), "batch rejected by distributor");
        }
        Ok(response)
    }

    /// Release the connection held by this handle.
    pub fn close(self) -> Result<(), CoreError> {
        Ok(self.inner.close()?)
    }
}
