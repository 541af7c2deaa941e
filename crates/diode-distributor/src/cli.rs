//! Clap derive structures for the `diode-distributor` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// diode-distributor -- authenticated gRPC front door for Diode ingestion
#[derive(Debug, Parser)]
#[command(
    name = "diode-distributor",
    version,
    about = "Accept, authenticate and validate Diode ingestion batches"
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "DIODE_DISTRIBUTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port (overrides GRPC_PORT and the config file)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, default_value = "pretty", env = "DIODE_DISTRIBUTOR_LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn port_and_verbosity_parse() {
        let cli = Cli::parse_from(["diode-distributor", "--port", "9000", "-vv", "--log-format", "json"]);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
