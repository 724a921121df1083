//! Command-line front end: argument parsing and the terminal status report

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::{demo_targets, MonitorConfig, TargetConfig};
use crate::engine::Monitor;
use crate::models::{Target, TargetState};

/// Poll HTTP endpoints and report their status
#[derive(Parser, Debug)]
#[command(name = "endpoint-monitor", version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file; missing file means defaults
    #[arg(long, global = true, env = "MONITOR_CONFIG", default_value = "monitor.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the dashboard and JSON API
    Serve(ServeArgs),
    /// Check endpoints from the terminal
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seconds between cycles
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Start monitoring immediately
    #[arg(long)]
    pub start: bool,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// URL to monitor (repeatable)
    #[arg(short, long = "url")]
    pub urls: Vec<String>,

    /// Display name for the URL in the same position (repeatable)
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// Seconds between cycles
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Check all URLs once and exit
    #[arg(short, long, conflicts_with = "continuous")]
    pub once: bool,

    /// Keep checking until interrupted (default)
    #[arg(short, long)]
    pub continuous: bool,
}

impl CheckArgs {
    /// Pairs each url with the name at the same position; no urls means the demo set.
    pub fn targets(&self) -> Vec<TargetConfig> {
        if self.urls.is_empty() {
            return demo_targets();
        }
        self.urls
            .iter()
            .enumerate()
            .map(|(i, url)| TargetConfig {
                url: url.clone(),
                name: self.names.get(i).cloned(),
            })
            .collect()
    }
}

pub fn render_report(targets: &[Target], states: &HashMap<String, TargetState>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n\u{1F4CA} Checking {} URLs at {}",
        targets.len(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{}", "=".repeat(80));

    for target in targets {
        let Some(state) = states.get(&target.url) else {
            continue;
        };
        let mut line = format!("{} {} {}", state.status.icon(), state.status, target.display_name);
        if let Some(code) = state.status_code {
            let _ = write!(line, " (HTTP {})", code);
        }
        let _ = write!(line, " - {}ms", state.response_time_ms);
        let _ = writeln!(out, "{}", line);

        if let Some(error) = &state.error_message {
            let _ = writeln!(out, "   Error: {}", error);
        }
        let _ = writeln!(out, "   URL: {}", target.url);
        let _ = writeln!(out);
    }
    out
}

async fn print_report(monitor: &Monitor) {
    let targets = monitor.list_targets().await;
    let states = monitor.get_all_states().await;
    print!("{}", render_report(&targets, &states));
}

pub async fn run_check(mut config: MonitorConfig, args: CheckArgs) -> anyhow::Result<()> {
    if let Some(interval) = args.interval {
        config.check_interval = interval;
    }
    if args.urls.is_empty() {
        println!("\u{1F4DD} No URLs specified, adding default test URLs...");
    }

    let monitor = Arc::new(Monitor::new(config)?);
    for target in args.targets() {
        let added = monitor.add_target(target.url, target.name).await;
        println!("\u{2705} Added: {} ({})", added.display_name, added.url);
    }

    if args.once {
        monitor.run_cycle().await;
        print_report(&monitor).await;
        return Ok(());
    }

    let interval = monitor.config().check_interval;
    println!(
        "\u{1F50D} Starting continuous monitoring (checking every {} seconds)",
        interval
    );
    println!("Press Ctrl+C to stop");

    let mut cycles = monitor.subscribe_cycles();
    monitor.start_monitoring().await;

    loop {
        tokio::select! {
            changed = cycles.changed() => {
                if changed.is_err() {
                    break;
                }
                print_report(&monitor).await;
                println!("\u{23F3} Waiting {} seconds until next check...", interval);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    monitor.stop_monitoring().await;
    println!("\n\u{23F9}\u{FE0F}  Monitoring stopped.");
    Ok(())
}
