//! Front-line gRPC distributor for Diode ingestion.
//!
//! Accepts `diode.v1.IngesterService/Ingest` calls, authenticates them by
//! API key, validates each batch and hands valid batches to a [`Sink`].
//! Lifecycle: [`Distributor::new`] → [`bind`](Distributor::bind) →
//! [`serve`](Distributor::serve), stopped through a [`DistributorHandle`].

pub mod auth;
pub mod error;
pub mod server;
pub mod service;
pub mod sink;

pub use auth::ApiKeyAuth;
pub use error::DistributorError;
pub use server::{Distributor, DistributorHandle, ServerState};
pub use service::IngestService;
pub use sink::{Acknowledge, Sink, SinkError};
