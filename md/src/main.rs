//! maindispatch - worker threads reporting to a single main loop
//!
//! CLI entry point. Runs the coordinator on the process main thread.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use maindispatch::cli::{Cli, get_log_path};
use maindispatch::config::Config;
use maindispatch::{Console, Coordinator};

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    match level_str.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(log_path: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));

    let log_file = fs::File::create(log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!(?level, log_path = %log_path.display(), "Logging initialized");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let log_path: PathBuf = cli.log_file.clone().unwrap_or_else(get_log_path);
    setup_logging(&log_path, cli.log_level.as_deref(), config.log_level.as_deref())
        .context("Failed to setup logging")?;

    debug!(?config, "maindispatch loaded config");

    let console = Console::new(config.coordinator.echo);
    console.main_thread(thread::current().id());

    let coordinator = Coordinator::new(config.coordinator, config.worker).context("Failed to create coordinator")?;
    let report = coordinator.run().await?;

    info!(
        notifications = report.notifications_received,
        finished = report.finished_order.len(),
        "Run complete"
    );
    Ok(())
}
