use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use nomad_node_exporter::api::NomadClient;
use nomad_node_exporter::config::{Cli, Settings};
use nomad_node_exporter::error::Result;
use nomad_node_exporter::exporter::{NodeRegistry, Poller};
use nomad_node_exporter::rest_api;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("using nomad api: {}", cli.address);
    if cli.disable_authentication {
        info!("authentication disabled");
    } else {
        info!("using TLS cert: {}", cli.cert.display());
        info!("using TLS key: {}", cli.key.display());
        info!("using TLS ca: {}", cli.ca.display());
    }
    info!("listening on port: {}", cli.port);
    info!("poll interval: {}s", cli.fetch_interval);
    info!("using allocations filter: {:?}", cli.filter);

    let settings = Settings::from_cli(cli)?;
    let client = NomadClient::new(&settings)?;
    let registry = Arc::new(RwLock::new(NodeRegistry::new()));

    let cancel = CancellationToken::new();

    let poller = Poller::new(client, registry.clone(), settings.fetch_interval);
    let poll_task = tokio::spawn(poller.run(cancel.clone()));

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
        }
        signal_cancel.cancel();
    });

    let served = rest_api::run_server(registry, settings.port, cancel.clone()).await;

    cancel.cancel();
    let _ = poll_task.await;

    served
}
