//! Fatal errors of the binary, rendered with miette.

use miette::Diagnostic;
use thiserror::Error;

use diode_config::ConfigError;
use diode_distributor::DistributorError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const BIND: i32 = 4;
    pub const TLS: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(diode::config),
        help(
            "Check the config file and DIODE_DISTRIBUTOR_* / GRPC_PORT variables.\n\
             Run: diode-distributor --help"
        )
    )]
    Config(#[source] ConfigError),

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(diode::bind),
        help("Another process may own the port. Pick another with --port or GRPC_PORT.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(diode::tls),
        help("Both DIODE_DISTRIBUTOR_TLS_CERT and DIODE_DISTRIBUTOR_TLS_KEY must point at readable PEM files.")
    )]
    Tls { message: String },

    #[error(transparent)]
    #[diagnostic(code(diode::server))]
    Server(DistributorError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Bind { .. } => exit_code::BIND,
            Self::Tls { .. } => exit_code::TLS,
            Self::Server(_) => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DistributorError> for CliError {
    fn from(err: DistributorError) -> Self {
        match err {
            DistributorError::Bind { addr, source } => Self::Bind {
                addr: addr.to_string(),
                source,
            },
            DistributorError::Tls(message) => Self::Tls { message },
            DistributorError::Config(err) => Self::Config(err),
            other => Self::Server(other),
        }
    }
}
