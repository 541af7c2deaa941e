// ── Onward sink ──
//
// Where validated batches go next. Routing and storage live behind this
// trait; the distributor only needs to know whether the hand-off worked.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use diode_core::IngestRequest;

#[derive(Debug, Error)]
#[error("sink unavailable: {message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receives every batch that passed authentication and validation.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    async fn forward(&self, request: IngestRequest) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for Arc<S> {
    async fn forward(&self, request: IngestRequest) -> Result<(), SinkError> {
        (**self).forward(request).await
    }
}

/// Accepts and drops every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Acknowledge;

#[async_trait]
impl Sink for Acknowledge {
    async fn forward(&self, request: IngestRequest) -> Result<(), SinkError> {
        info!(
            id = %request.id,
            stream = %request.stream,
            producer = %request.producer_app_name,
            entities = request.entities.len(),
            "acknowledged batch"
        );
        Ok(())
    }
}
