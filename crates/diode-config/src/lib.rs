//! Configuration for Diode clients and the distributor.
//!
//! The client side is resolved from `DIODE_*` environment variables into a
//! `diode_api::ClientConfig`. The distributor layers defaults, an optional
//! TOML file and environment variables through `figment`.

mod client;
mod distributor;

use std::ffi::OsString;

use thiserror::Error;

pub use client::{
    API_KEY_ENV, GRPC_HOST_ENV, GRPC_INSECURE_ENV, GRPC_PORT_ENV, GRPC_TIMEOUT_SECONDS_ENV,
    client_config_from, client_config_from_env,
};
pub use distributor::{
    API_KEYS_ENV, DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT, DistributorConfig, LISTEN_PORT_ENV, TlsFiles,
};

// ── Error ───────────────────────────────────────────────────────────

/// Configuration problems. Always local: nothing here touches the network.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} not found")]
    MissingEnvVar { name: &'static str },

    #[error("environment variable {name} is not valid UTF-8")]
    InvalidEnvVar { name: &'static str },

    #[error("invalid timeout value")]
    InvalidTimeout,

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Environment ─────────────────────────────────────────────────────

/// Read `name`, telling "unset" apart from "set but not UTF-8".
pub(crate) fn env_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    env_value(name, std::env::var_os(name))
}

fn env_value(name: &'static str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    raw.map(|raw| raw.into_string().map_err(|_| ConfigError::InvalidEnvVar { name }))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_utf8_values() {
        assert_eq!(env_value("DIODE_API_KEY", None).unwrap(), None);
        assert_eq!(
            env_value("DIODE_API_KEY", Some("k".into())).unwrap(),
            Some("k".to_owned())
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_value_is_invalid_not_missing() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'k', 0xff, b'y']);
        let err = env_value("DIODE_API_KEY", Some(raw)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { name: "DIODE_API_KEY" }));
        assert_eq!(
            err.to_string(),
            "environment variable DIODE_API_KEY is not valid UTF-8"
        );
    }
}
