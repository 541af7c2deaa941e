// ── Client environment ──────────────────────────────────────────────
//
// Resolution of the SDK connection settings. Every variable is optional
// except the API key; host and port are used verbatim.

use std::collections::HashMap;
use std::time::Duration;

use diode_api::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, TlsMode, TransportConfig};
use secrecy::SecretString;
use tracing::debug;

use crate::{ConfigError, env_var};

pub const API_KEY_ENV: &str = "DIODE_API_KEY";
pub const GRPC_HOST_ENV: &str = "DIODE_GRPC_HOST";
pub const GRPC_PORT_ENV: &str = "DIODE_GRPC_PORT";
pub const GRPC_INSECURE_ENV: &str = "DIODE_GRPC_INSECURE";
pub const GRPC_TIMEOUT_SECONDS_ENV: &str = "DIODE_GRPC_TIMEOUT_SECONDS";

/// Resolve a `ClientConfig` from the process environment.
///
/// A variable that is set but not UTF-8 is an error, never "unset".
pub fn client_config_from_env() -> Result<ClientConfig, ConfigError> {
    let mut vars = HashMap::new();
    for name in [
        API_KEY_ENV,
        GRPC_HOST_ENV,
        GRPC_PORT_ENV,
        GRPC_INSECURE_ENV,
        GRPC_TIMEOUT_SECONDS_ENV,
    ] {
        if let Some(value) = env_var(name)? {
            vars.insert(name, value);
        }
    }
    client_config_from(|name| vars.get(name).cloned())
}

/// Resolve a `ClientConfig` through an arbitrary variable lookup.
///
/// `lookup` returns `None` for unset variables. An API key that is set but
/// empty counts as present; the distributor will reject it.
pub fn client_config_from<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(API_KEY_ENV).ok_or(ConfigError::MissingEnvVar { name: API_KEY_ENV })?;

    let host = lookup(GRPC_HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.into());
    let port = lookup(GRPC_PORT_ENV).unwrap_or_else(|| DEFAULT_PORT.into());
    let tls = tls_mode(lookup(GRPC_INSECURE_ENV).as_deref());
    let timeout = timeout(lookup(GRPC_TIMEOUT_SECONDS_ENV).as_deref())?;

    debug!(host = %host, port = %port, tls = ?tls, timeout_secs = timeout.as_secs(), "resolved client config");

    Ok(ClientConfig {
        api_key: SecretString::from(api_key),
        transport: TransportConfig {
            host,
            port,
            tls,
            timeout,
        },
    })
}

/// Only the literal `true` turns TLS off.
fn tls_mode(raw: Option<&str>) -> TlsMode {
    match raw {
        Some("true") => TlsMode::Insecure,
        _ => TlsMode::System,
    }
}

fn timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    match raw {
        None | Some("") => Ok(DEFAULT_TIMEOUT),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidTimeout),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        client_config_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = resolve(&[("DIODE_GRPC_HOST", "diode.local")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar { name: "DIODE_API_KEY" }));
        assert_eq!(err.to_string(), "environment variable DIODE_API_KEY not found");
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = resolve(&[("DIODE_API_KEY", "k")]).unwrap();
        assert_eq!(config.api_key.expose_secret(), "k");
        assert_eq!(config.transport.target(), "127.0.0.1:8081");
        assert_eq!(config.transport.tls, TlsMode::System);
        assert_eq!(config.transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn host_and_port_are_taken_verbatim() {
        let config = resolve(&[
            ("DIODE_API_KEY", "k"),
            ("DIODE_GRPC_HOST", "ingest.example.net"),
            ("DIODE_GRPC_PORT", "443"),
        ])
        .unwrap();
        assert_eq!(config.transport.target(), "ingest.example.net:443");
    }

    #[test]
    fn only_literal_true_disables_tls() {
        for (raw, expected) in [
            ("true", TlsMode::Insecure),
            ("false", TlsMode::System),
            ("TRUE", TlsMode::System),
            ("1", TlsMode::System),
            ("yes please", TlsMode::System),
            ("", TlsMode::System),
        ] {
            let config = resolve(&[("DIODE_API_KEY", "k"), ("DIODE_GRPC_INSECURE", raw)]).unwrap();
            assert_eq!(config.transport.tls, expected, "DIODE_GRPC_INSECURE={raw:?}");
        }
    }

    #[test]
    fn timeout_override_and_rejection() {
        let config =
            resolve(&[("DIODE_API_KEY", "k"), ("DIODE_GRPC_TIMEOUT_SECONDS", "30")]).unwrap();
        assert_eq!(config.transport.timeout, Duration::from_secs(30));

        for raw in ["abc", "0", "-3", "1.5"] {
            let err = resolve(&[("DIODE_API_KEY", "k"), ("DIODE_GRPC_TIMEOUT_SECONDS", raw)])
                .unwrap_err();
            assert_eq!(err.to_string(), "invalid timeout value", "value {raw:?}");
        }
    }

    #[test]
    fn reads_the_process_environment() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DIODE_API_KEY", "from-env");
            jail.set_env("DIODE_GRPC_PORT", "9443");
            jail.set_env("DIODE_GRPC_INSECURE", "true");

            let config = client_config_from_env().unwrap();
            assert_eq!(config.api_key.expose_secret(), "from-env");
            assert_eq!(config.transport.port, "9443");
            assert_eq!(config.transport.tls, TlsMode::Insecure);
            Ok(())
        });
    }
}
