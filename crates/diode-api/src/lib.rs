// diode-api: gRPC schema, transport, and authenticated client for the Diode ingestion API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;

/// Generated protobuf and gRPC types for `diode.v1`.
#[allow(
    clippy::all,
    clippy::pedantic,
    clippy::large_enum_variant,
    missing_docs,
    unreachable_pub
)]
pub mod proto {
    pub mod v1 {
        tonic::include_proto!("diode.v1");
    }
}

/// Encoded `FileDescriptorSet` of the `diode.v1` schema, for server reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("diode_descriptor");

pub use auth::{API_KEY_METADATA_KEY, ApiKeyInterceptor};
pub use client::{CallOptions, ClientConfig, IngesterClient};
pub use error::Error;
pub use transport::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, SDK_NAME, SDK_VERSION, TlsMode, TransportConfig,
    user_agent,
};
