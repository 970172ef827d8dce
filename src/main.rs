mod cli;
mod kubernetes;
mod types;
mod utils;

use clap::Parser;
use tracing::{debug, warn};

use cli::Cli;
use kubernetes::{init_client, list_pods, summarize_logs, watch_pods};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr, stdout carries the listing and events
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let kubeconfig = cli.kubeconfig_path();
    let client = init_client(kubeconfig.as_deref(), cli.context.as_deref()).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let count = list_pods(&client, &mut out).await?;
    debug!("Listed {} pods", count);

    summarize_logs(&client, &cli.log_namespace, &cli.prefix, &mut out).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    watch_pods(&client, &mut out, shutdown).await
}
