mod cli;
mod diagnostic;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diode_config::DistributorConfig;
use diode_distributor::{Acknowledge, Distributor, DistributorHandle};

use crate::cli::{Cli, LogFormat};
use crate::diagnostic::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, format: LogFormat) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = DistributorConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.grpc_port = port;
    }

    let mut distributor = Distributor::new(config, Acknowledge);
    distributor.bind().await?;

    tokio::spawn(stop_on_signal(distributor.handle()));

    distributor.serve().await?;
    Ok(())
}

async fn stop_on_signal(handle: DistributorHandle) {
    shutdown_signal().await;
    info!("shutdown signal received");
    handle.shutdown();
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
