/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Running price dashboard with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use oracle_dash_tui::{tui, DashboardConfig, PriceFeed, TableModel};

#[derive(Parser, Debug)]
#[command(name = "oracle-dash", version, about = "Live price dashboard for a streaming oracle")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "url", value_name = "WS_URL")]
    url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let mut config = match &args.config_path {
        Some(path) => {
            let path = path.to_str().context("config path must be valid utf-8")?;
            DashboardConfig::from_file(path).context("load config")?
        }
        None => DashboardConfig::default(),
    };
    if let Some(url) = args.url {
        config.ws_url = url;
    }
    info!(ws_url = %config.ws_url, "starting oracle-dash");

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let table = Arc::new(Mutex::new(TableModel::new()));
    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let (feed, connection_state) = PriceFeed::new(config, Arc::clone(&table), shutdown.clone());
    let feed_handle = tokio::spawn(feed.run());

    tui::run(table, connection_state, shutdown.clone()).await?;
    shutdown.cancel();

    feed_handle.await.context("join feed worker")?;
    info!("dashboard shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    // Stderr keeps log output off the alternate screen.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
