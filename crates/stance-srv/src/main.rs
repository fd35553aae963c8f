//! stanced: the stance posture evaluation daemon.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stance_engine::{Evaluator, OpenPortsProbe, SystemStateProbe};
use stance_srv::{server, ServerConfig};

/// Device posture evaluation service.
///
/// Probes the host it runs on with external inspection tools and serves a
/// deterministic trust score over HTTP.
#[derive(Debug, Parser)]
#[command(name = "stanced", version, about)]
struct Args {
    /// Path to a TOML config file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing based on verbosity.
    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let evaluator = Evaluator::with_probes(
        SystemStateProbe::new(&config.tools.osquery),
        OpenPortsProbe::new(&config.tools.nmap),
    );

    server::run(&config, evaluator).await?;
    Ok(())
}
