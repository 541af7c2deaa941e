// ── Distributor configuration ───────────────────────────────────────
//
// Precedence, lowest first: built-in defaults, optional TOML file,
// `GRPC_PORT`, then `DIODE_DISTRIBUTOR_*` variables. The API key list is
// read as raw text: figment would otherwise coerce `007` or `true`.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::{ConfigError, env_var};

/// Address the distributor listens on when none is configured.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// Port the distributor listens on when none is configured.
pub const DEFAULT_LISTEN_PORT: u16 = 8081;

/// The single variable selecting the listen port.
pub const LISTEN_PORT_ENV: &str = "GRPC_PORT";

const ENV_PREFIX: &str = "DIODE_DISTRIBUTOR_";

/// Comma-separated API keys, taken verbatim.
pub const API_KEYS_ENV: &str = "DIODE_DISTRIBUTOR_API_KEYS";

#[derive(Clone, Deserialize)]
pub struct DistributorConfig {
    /// IP literal to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub grpc_port: u16,

    /// Accepted API keys. Empty rejects every call.
    #[serde(default, deserialize_with = "key_list")]
    pub api_keys: Vec<SecretString>,

    /// PEM certificate chain. Requires `tls_key`.
    #[serde(default)]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key. Requires `tls_cert`.
    #[serde(default)]
    pub tls_key: Option<PathBuf>,
}

fn default_host() -> String {
    DEFAULT_LISTEN_HOST.into()
}
fn default_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            grpc_port: default_port(),
            api_keys: Vec::new(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl fmt::Debug for DistributorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistributorConfig")
            .field("host", &self.host)
            .field("grpc_port", &self.grpc_port)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .field("tls_cert", &self.tls_cert)
            .field("tls_key", &self.tls_key)
            .finish()
    }
}

/// Certificate and key paths for server-side TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl DistributorConfig {
    /// The layered figment, exposed so callers can add providers on top.
    pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment
            .merge(Env::raw().only(&[LISTEN_PORT_ENV]))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["api_keys"]));
        if let Some(keys) = env_var(API_KEYS_ENV)? {
            figment = figment.merge(Serialized::default("api_keys", keys));
        }
        Ok(figment)
    }

    /// Load and validate. A missing file is treated as empty.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;
        self.tls_files()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Validation {
            field: "host".into(),
            reason: format!("'{}' is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.grpc_port))
    }

    /// `None` for plaintext; an error when only one half is configured.
    pub fn tls_files(&self) -> Result<Option<TlsFiles>, ConfigError> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Ok(Some(TlsFiles {
                cert: cert.clone(),
                key: key.clone(),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Validation {
                field: "tls_key".into(),
                reason: "required when tls_cert is set".into(),
            }),
            (None, Some(_)) => Err(ConfigError::Validation {
                field: "tls_cert".into(),
                reason: "required when tls_key is set".into(),
            }),
        }
    }
}

/// Keys come either as a TOML array or as one comma-separated string.
fn key_list<'de, D>(deserializer: D) -> Result<Vec<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        One(String),
    }

    let raw = match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::One(one) => one.split(',').map(|s| s.trim().to_owned()).collect(),
    };

    Ok(raw
        .into_iter()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn keys(config: &DistributorConfig) -> Vec<&str> {
        config.api_keys.iter().map(|k| k.expose_secret()).collect()
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = DistributorConfig::load(None).unwrap();
            assert_eq!(config.listen_addr().unwrap(), "0.0.0.0:8081".parse().unwrap());
            assert!(config.api_keys.is_empty());
            assert_eq!(config.tls_files().unwrap(), None);
            Ok(())
        });
    }

    #[test]
    fn grpc_port_selects_the_listen_port() {
        Jail::expect_with(|jail| {
            jail.set_env("GRPC_PORT", "9191");
            let config = DistributorConfig::load(None).unwrap();
            assert_eq!(config.grpc_port, 9191);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "distributor.toml",
                r#"
                    host = "127.0.0.1"
                    grpc_port = 7000
                    api_keys = ["alpha", "beta"]
                "#,
            )?;
            jail.set_env("DIODE_DISTRIBUTOR_GRPC_PORT", "7001");

            let config = DistributorConfig::load(Some(Path::new("distributor.toml"))).unwrap();
            assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:7001".parse().unwrap());
            assert_eq!(keys(&config), vec!["alpha", "beta"]);
            Ok(())
        });
    }

    #[test]
    fn comma_separated_keys_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("DIODE_DISTRIBUTOR_API_KEYS", "one, two,,three");
            let config = DistributorConfig::load(None).unwrap();
            assert_eq!(keys(&config), vec!["one", "two", "three"]);
            Ok(())
        });
    }

    #[test]
    fn scalar_looking_keys_from_env_are_kept_as_text() {
        for raw in ["123456", "007", "true", "1.5", "12345678901234567890"] {
            Jail::expect_with(|jail| {
                jail.set_env("DIODE_DISTRIBUTOR_API_KEYS", raw);
                let config = DistributorConfig::load(None).unwrap();
                assert_eq!(keys(&config), vec![raw]);
                Ok(())
            });
        }
    }

    #[test]
    fn env_keys_replace_file_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("distributor.toml", r#"api_keys = ["alpha"]"#)?;
            jail.set_env("DIODE_DISTRIBUTOR_API_KEYS", "007,false");

            let config = DistributorConfig::load(Some(Path::new("distributor.toml"))).unwrap();
            assert_eq!(keys(&config), vec!["007", "false"]);
            Ok(())
        });
    }

    #[test]
    fn half_configured_tls_is_rejected() {
        let config = DistributorConfig {
            tls_cert: Some("server.pem".into()),
            ..DistributorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid tls_key: required when tls_cert is set");
    }

    #[test]
    fn hostname_is_not_a_listen_address() {
        let config = DistributorConfig {
            host: "localhost".into(),
            ..DistributorConfig::default()
        };
        assert!(matches!(
            config.listen_addr(),
            Err(ConfigError::Validation { field, .. }) if field == "host"
        ));
    }

    #[test]
    fn debug_redacts_keys() {
        let config = DistributorConfig {
            api_keys: vec![SecretString::from("hunter2".to_owned())],
            ..DistributorConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("1 redacted"));
    }
}
