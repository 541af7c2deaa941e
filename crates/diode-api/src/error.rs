use std::time::Duration;

use thiserror::Error;
use tonic::Code;

/// Top-level error type for the `diode-api` crate.
///
/// Covers channel construction and every failure a single ingest call can
/// surface. Schema violations are *not* errors at this layer: the server
/// reports them in-band in `IngestResponse.errors`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction ────────────────────────────────────────────────
    /// The `host:port` target could not be turned into an endpoint URI.
    #[error("invalid target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The API key cannot be carried as an ASCII metadata value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// TLS configuration could not be applied to the endpoint.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The distributor rejected the credential (missing or unknown key).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The call did not complete before its deadline.
    #[error("deadline exceeded after {}ms", .timeout.as_millis())]
    DeadlineExceeded { timeout: Duration },

    /// The caller cancelled the call, or the server abandoned it.
    #[error("call cancelled: {message}")]
    Cancelled { message: String },

    /// The distributor is unreachable (connect, HTTP/2 or TLS failure) or
    /// could not forward the batch.
    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    /// Any other non-OK gRPC status.
    #[error("gRPC error ({code}): {message}")]
    Rpc { code: Code, message: String },
}

impl Error {
    /// Returns `true` if the call failed because of its deadline or a cancellation.
    pub fn is_deadline_or_cancelled(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. } | Self::Cancelled { .. })
    }

    /// Returns `true` if this is a transient error worth retrying by the caller.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::DeadlineExceeded { .. }
        )
    }

    /// Returns `true` if the distributor rejected the credential.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The gRPC status code this error corresponds to, if it came off the wire.
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Authentication { .. } => Some(Code::Unauthenticated),
            Self::DeadlineExceeded { .. } => Some(Code::DeadlineExceeded),
            Self::Cancelled { .. } => Some(Code::Cancelled),
            Self::Unavailable { .. } => Some(Code::Unavailable),
            Self::Rpc { code, .. } => Some(*code),
            Self::InvalidTarget { .. } | Self::InvalidApiKey(_) | Self::Tls(_) => None,
        }
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        let message = status.message().to_owned();
        match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => Self::Authentication { message },
            Code::DeadlineExceeded => Self::DeadlineExceeded {
                timeout: Duration::ZERO,
            },
            Code::Cancelled => Self::Cancelled { message },
            Code::Unavailable => Self::Unavailable { message },
            code => Self::Rpc { code, message },
        }
    }
}
