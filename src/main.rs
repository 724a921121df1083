use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use endpoint_monitor::cli::{self, Cli, Command, ServeArgs};
use endpoint_monitor::{api, utils, Monitor, MonitorConfig};

#[tokio::main]
async fn main() -> Result<()> {
    utils::setup_console();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_ansi(true)
        .init();

    let args = Cli::parse();
    let config = MonitorConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    match args.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(serve) => run_server(config, serve).await,
        Command::Check(check) => cli::run_check(config, check).await,
    }
}

async fn run_server(mut config: MonitorConfig, args: ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.api_port = port;
    }
    if let Some(interval) = args.interval {
        config.check_interval = interval;
    }
    let auto_start = config.auto_start || args.start;
    let api_port = config.api_port;
    let initial_targets = config.initial_targets();

    let monitor = Arc::new(Monitor::new(config).context("Failed to build monitor")?);
    monitor.seed(&initial_targets).await;

    if auto_start {
        monitor.start_monitoring().await;
    }

    api::start_server(api_port, Arc::clone(&monitor)).await?;

    info!("Shutdown signal received. Stopping monitor...");
    monitor.stop_monitoring().await;
    Ok(())
}
