// ── Server lifecycle ──
//
// Created → Listening → Stopping → Stopped. Binding is a separate step so a
// port conflict is reported before anything is served, and so tests can
// bind port 0 and learn the real address. A bind failure is terminal.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Identity, Server, ServerTlsConfig};
use tracing::{info, warn};

use diode_api::FILE_DESCRIPTOR_SET;
use diode_api::proto::v1::ingester_service_server::IngesterServiceServer;
use diode_config::DistributorConfig;

use crate::auth::ApiKeyAuth;
use crate::error::DistributorError;
use crate::service::IngestService;
use crate::sink::Sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ServerState {
    Created,
    Listening,
    /// No new calls are accepted; in-flight calls are finishing.
    Stopping,
    Stopped,
}

pub struct Distributor<S> {
    config: DistributorConfig,
    sink: Arc<S>,
    listener: Option<TcpListener>,
    state: watch::Sender<ServerState>,
    shutdown: CancellationToken,
}

impl<S: Sink> Distributor<S> {
    pub fn new(config: DistributorConfig, sink: S) -> Self {
        let (state, _) = watch::channel(ServerState::Created);
        Self {
            config,
            sink: Arc::new(sink),
            listener: None,
            state,
            shutdown: CancellationToken::new(),
        }
    }

    /// A handle for observing state and requesting shutdown.
    pub fn handle(&self) -> DistributorHandle {
        DistributorHandle {
            state: self.state.subscribe(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Bind the configured address. Returns the bound address.
    pub async fn bind(&mut self) -> Result<SocketAddr, DistributorError> {
        if self.listener.is_some() {
            return Err(DistributorError::AlreadyBound);
        }
        let addr = self.config.listen_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| DistributorError::Bind { addr, source })?;
        let local = listener
            .local_addr()
            .map_err(|source| DistributorError::Bind { addr, source })?;

        self.listener = Some(listener);
        self.state.send_replace(ServerState::Listening);
        info!(addr = %local, "distributor listening");
        Ok(local)
    }

    /// Serve until [`DistributorHandle::shutdown`] is called.
    ///
    /// Shutdown is graceful: the listener stops accepting, in-flight calls
    /// run to completion, then the state becomes `Stopped`.
    pub async fn serve(self) -> Result<(), DistributorError> {
        let Self {
            config,
            sink,
            listener,
            state,
            shutdown,
        } = self;
        let listener = listener.ok_or(DistributorError::NotBound)?;

        let result = run(&config, sink, listener, &state, &shutdown).await;

        state.send_replace(ServerState::Stopped);
        info!("distributor stopped");
        result
    }
}

async fn run<S: Sink>(
    config: &DistributorConfig,
    sink: Arc<S>,
    listener: TcpListener,
    state: &watch::Sender<ServerState>,
    shutdown: &CancellationToken,
) -> Result<(), DistributorError> {
    let mut builder = Server::builder();
    if let Some(tls) = tls_config(config).await? {
        builder = builder
            .tls_config(tls)
            .map_err(|e| DistributorError::Tls(e.to_string()))?;
    }

    if config.api_keys.is_empty() {
        warn!("no API keys configured; every call will be rejected");
    }
    let auth = ApiKeyAuth::new(config.api_keys.iter().cloned());
    let ingest = IngesterServiceServer::with_interceptor(IngestService::new(sink), auth);

    let reflection_v1 = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;
    let reflection_v1alpha = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1alpha()?;

    let signal = async {
        shutdown.cancelled().await;
        state.send_replace(ServerState::Stopping);
        info!("distributor stopping");
    };

    builder
        .add_service(ingest)
        .add_service(reflection_v1)
        .add_service(reflection_v1alpha)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
        .await
        .map_err(DistributorError::Serve)
}

async fn tls_config(config: &DistributorConfig) -> Result<Option<ServerTlsConfig>, DistributorError> {
    let Some(files) = config.tls_files()? else {
        return Ok(None);
    };
    let cert = tokio::fs::read(&files.cert).await.map_err(|e| {
        DistributorError::Tls(format!("cannot read {}: {e}", files.cert.display()))
    })?;
    let key = tokio::fs::read(&files.key).await.map_err(|e| {
        DistributorError::Tls(format!("cannot read {}: {e}", files.key.display()))
    })?;
    Ok(Some(
        ServerTlsConfig::new().identity(Identity::from_pem(cert, key)),
    ))
}

/// Observes and stops a [`Distributor`] from elsewhere.
#[derive(Debug, Clone)]
pub struct DistributorHandle {
    state: watch::Receiver<ServerState>,
    shutdown: CancellationToken,
}

impl DistributorHandle {
    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Request a graceful stop. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait until the distributor has reached `target` or a later state.
    pub async fn wait_for(&self, target: ServerState) -> Result<ServerState, DistributorError> {
        let mut state = self.state.clone();
        state
            .wait_for(|current| *current >= target)
            .await
            .map(|current| *current)
            .map_err(|_| DistributorError::Detached)
    }
}
