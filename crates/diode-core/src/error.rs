// ── Core error types ──
//
// What SDK callers see. Transport-layer errors from `diode_api` are folded
// into a smaller set of outcomes; configuration and local validation
// failures never reach the network.

use std::time::Duration;

use thiserror::Error;

use diode_config::ConfigError;

use crate::validate::Violation;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local errors ─────────────────────────────────────────────────
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("request failed validation: {}", summarize(.errors))]
    Validation { errors: Vec<Violation> },

    #[error("cannot start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    // ── Call errors ──────────────────────────────────────────────────
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("ingest timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("ingest cancelled: {message}")]
    Cancelled { message: String },

    #[error("transport error: {message}")]
    Transport { message: String, transient: bool },

    #[error("distributor returned {code}: {message}")]
    Rpc { code: tonic::Code, message: String },
}

fn summarize(errors: &[Violation]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    /// Worth retrying the same request later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport { transient, .. } => *transient,
            _ => false,
        }
    }

    /// The violations, when this is a validation failure.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<Vec<Violation>> for CoreError {
    fn from(errors: Vec<Violation>) -> Self {
        Self::Validation { errors }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<diode_api::Error> for CoreError {
    fn from(err: diode_api::Error) -> Self {
        let transient = err.is_transient();
        match err {
            diode_api::Error::Authentication { message } => Self::Authentication { message },
            diode_api::Error::InvalidApiKey(reason) => Self::Config(ConfigError::Validation {
                field: "api_key".into(),
                reason,
            }),
            diode_api::Error::DeadlineExceeded { timeout } => Self::Timeout { timeout },
            diode_api::Error::Cancelled { message } => Self::Cancelled { message },
            diode_api::Error::Rpc { code, message } => Self::Rpc { code, message },
            other @ (diode_api::Error::InvalidTarget { .. }
            | diode_api::Error::Tls(_)
            | diode_api::Error::Unavailable { .. }) => Self::Transport {
                message: other.to_string(),
                transient,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_violation() {
        let err = CoreError::from(vec![
            Violation {
                path: "stream".into(),
                message: "must be between 1 and 255 characters".into(),
            },
            Violation {
                path: "sdk_version".into(),
                message: "bad".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "request failed validation: stream: must be between 1 and 255 characters; sdk_version: bad"
        );
        assert_eq!(err.violations().len(), 2);
        assert!(!err.is_transient());
    }

    #[test]
    fn api_errors_are_folded() {
        let auth = CoreError::from(diode_api::Error::Authentication {
            message: "missing or invalid authorization header".into(),
        });
        assert!(matches!(auth, CoreError::Authentication { .. }));

        let unavailable = CoreError::from(diode_api::Error::Unavailable {
            message: "down".into(),
        });
        assert!(unavailable.is_transient());

        let deadline = CoreError::from(diode_api::Error::DeadlineExceeded {
            timeout: Duration::from_secs(5),
        });
        assert_eq!(deadline.to_string(), "ingest timed out after 5000ms");
    }

    #[test]
    fn missing_key_surfaces_unchanged() {
        let err = CoreError::from(ConfigError::MissingEnvVar {
            name: "DIODE_API_KEY",
        });
        assert_eq!(
            err.to_string(),
            "configuration error: environment variable DIODE_API_KEY not found"
        );
    }
}
