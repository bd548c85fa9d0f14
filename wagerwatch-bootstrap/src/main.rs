use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use wagerwatch_bootstrap::{init_logging, run_standalone, RunMode};
use wagerwatch_infrastructure::{AppConfig, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(name = "wagerwatch")]
#[command(about = "Flags deposit/bet/withdrawal cycling and improbable win streaks", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyze the current input once and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = &args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    // Console logging until the configured subscriber is installed.
    let bootstrap_guard = tracing::subscriber::set_default(
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .finish(),
    );
    let config = AppConfig::load().await?;
    drop(bootstrap_guard);

    let _log_guard = init_logging(&config)?;

    let mode = if args.once {
        RunMode::Once
    } else {
        RunMode::Service
    };
    run_standalone(config, mode).await
}
