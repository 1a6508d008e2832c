//! node-pulse command line.
//!
//! ```text
//! node-pulse [--config pulse.toml] [--node-type lightapi] [--network mainnet] <command>
//!
//!   watch        refresh on the configured interval until Ctrl+C
//!   get          print the best healthy endpoint
//!   list [--json] evaluate once and print every healthy endpoint
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use node_pulse::config::{load_config, PulseConfig};
use node_pulse::observability::{logging, metrics};
use node_pulse::{Endpoint, Network, NodePulse, PulseError, ServiceType};

#[derive(Parser)]
#[command(name = "node-pulse")]
#[command(about = "Pick healthy endpoints from WAX service pools", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service type (hyperion, atomic, lightapi, ipfs).
    #[arg(short = 't', long)]
    node_type: Option<ServiceType>,

    /// Network (mainnet, testnet).
    #[arg(short, long)]
    network: Option<Network>,

    /// Maximum number of nodes to keep.
    #[arg(long)]
    count: Option<usize>,

    /// Refresh interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh continuously, logging every notification
    Watch,
    /// Print the best healthy endpoint
    Get,
    /// Evaluate once and print the healthy endpoints
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct NodeReport<'a> {
    node_type: ServiceType,
    network: Network,
    source: ServiceType,
    fallback: bool,
    nodes: &'a [Endpoint],
}

fn resolve_config(cli: &Cli) -> Result<PulseConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PulseConfig::default(),
    };
    if let Some(node_type) = cli.node_type {
        config.node_type = node_type;
    }
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(count) = cli.count {
        config.node_count = count;
    }
    if let Some(interval) = cli.interval_ms {
        config.update_interval_ms = interval;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        node_type = %config.node_type,
        network = %config.network,
        node_count = config.node_count,
        update_interval_ms = config.update_interval_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Watch => {
            let pulse = NodePulse::builder(config)
                .on_node_update(|nodes| {
                    let list: Vec<&str> = nodes.iter().map(Endpoint::as_str).collect();
                    tracing::info!(nodes = ?list, "Available nodes");
                })
                .on_error(|e| tracing::error!(error = %e, "Refresh failed"))
                .on_fallback(|node_type, nodes| {
                    tracing::warn!(active = %node_type, nodes = nodes.len(), "Active pool changed");
                })
                .build()?;

            pulse.start().await;
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutdown signal received");
            pulse.stop();
        }
        Commands::Get => {
            let pulse = NodePulse::new(config)?;
            match pulse.get_node().await {
                Ok(node) => println!("{}", node),
                Err(e @ PulseError::NoHealthyEndpoints { .. }) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::List { json } => {
            let pulse = NodePulse::new(config)?;
            let state = pulse.refresh().await;
            if json {
                let report = NodeReport {
                    node_type: pulse.config().node_type,
                    network: pulse.config().network,
                    source: state.source.node_type,
                    fallback: state.is_fallback(),
                    nodes: &state.nodes,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                if state.is_fallback() {
                    eprintln!("(fallback: {} {} pool)", state.source.node_type, state.source.tier);
                }
                for node in &state.nodes {
                    println!("{}", node);
                }
            }
        }
    }

    Ok(())
}
