// Raw gRPC client for the ingestion API
//
// Wraps the generated `IngesterServiceClient` with the API key interceptor,
// the user agent, and deadline/cancellation handling. Speaks wire types
// only; schema mapping and local validation live in `diode-core`.

use std::time::Duration;

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tracing::{debug, trace};

use crate::auth::ApiKeyInterceptor;
use crate::error::Error;
use crate::proto::v1::ingester_service_client::IngesterServiceClient;
use crate::proto::v1::{IngestRequest, IngestResponse};
use crate::transport::TransportConfig;

type InnerClient = IngesterServiceClient<InterceptedService<Channel, ApiKeyInterceptor>>;

/// Everything needed to build an [`IngesterClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credential attached to every call.
    pub api_key: SecretString,
    pub transport: TransportConfig,
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Deadline for this call; falls back to the transport timeout.
    pub timeout: Option<Duration>,
    /// Token that aborts the wait when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Authenticated, lazily-connected handle to a distributor.
///
/// Cheap to clone; clones share the single underlying HTTP/2 connection,
/// so concurrent calls need no external locking. Dropping the last clone
/// (or calling [`close`](Self::close)) releases the connection.
#[derive(Debug, Clone)]
pub struct IngesterClient {
    inner: InnerClient,
    default_timeout: Duration,
    target: String,
}

impl IngesterClient {
    /// Build a client from a `ClientConfig`.
    ///
    /// Does not connect. Fails only on an unusable API key or a malformed
    /// target / TLS configuration. Must be called inside a tokio runtime.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let interceptor = ApiKeyInterceptor::new(&config.api_key)?;
        let channel = config.transport.connect_lazy()?;
        let target = config.transport.target();

        debug!(endpoint = %target, "ingester client ready");

        Ok(Self {
            inner: IngesterServiceClient::with_interceptor(channel, interceptor),
            default_timeout: config.transport.timeout,
            target,
        })
    }

    /// The `host:port` this client talks to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Send one batch with the default deadline.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, Error> {
        self.ingest_with(request, CallOptions::default()).await
    }

    /// Send one batch with per-call deadline and cancellation.
    ///
    /// The deadline is both advertised to the server (`grpc-timeout`) and
    /// enforced locally, so the caller stops waiting even if the server
    /// never answers.
    pub async fn ingest_with(
        &self,
        request: IngestRequest,
        options: CallOptions,
    ) -> Result<IngestResponse, Error> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let cancel = options.cancel.unwrap_or_default();

        trace!(
            stream = %request.stream,
            id = %request.id,
            entities = request.entities.len(),
            "sending ingest request"
        );

        let mut call = tonic::Request::new(request);
        call.set_timeout(timeout);

        let mut client = self.inner.clone();
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(Error::Cancelled {
                    message: "cancelled by caller".into(),
                });
            }
            result = tokio::time::timeout(timeout, client.ingest(call)) => match result {
                Ok(response) => response?,
                Err(_) => return Err(Error::DeadlineExceeded { timeout }),
            },
        };

        Ok(response.into_inner())
    }

    /// Release the connection. Consumes the handle, so it runs once.
    ///
    /// Other clones keep the connection alive until they are dropped too.
    pub fn close(self) -> Result<(), Error> {
        debug!(endpoint = %self.target, "closing ingester client");
        drop(self.inner);
        Ok(())
    }
}
