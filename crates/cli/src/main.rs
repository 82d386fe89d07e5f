//! ForeignEye CLI - read articles and collect the concepts they teach

mod commands;
mod config;
mod logging;
mod output;
mod state_dir;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use config::Settings;
use foreigneye_client::{ApiClient, ApiClientBuilder, FileSessionStore};
use state_dir::StateDir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, warn};

#[derive(Parser)]
#[command(name = "foreigneye")]
#[command(about = "Read articles and build your concept knowledge map")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory for configuration, session and logs
    #[arg(short = 'd', long, global = true, env = "FOREIGNEYE_STATE_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = StateDir::resolve(cli.data_dir);
    state_dir.create_directories()?;

    let log_path = (!cli.no_file_log).then(|| state_dir.log_path());
    logging::init_logging(cli.log_level.into(), log_path.as_deref())?;

    let settings = Settings::load(cli.config.as_deref(), &state_dir)?;
    let client = build_client(&settings, &state_dir)?;
    debug!(base_url = client.base_url(), "Client ready");

    let outcome = if cli.timeout == 0 {
        cli.command.execute(&client).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        tokio::time::timeout(timeout_duration, cli.command.execute(&client))
            .await
            .unwrap_or_else(|_| {
                Err(anyhow::anyhow!(
                    "Command timed out after {} seconds",
                    cli.timeout
                ))
            })
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        eprintln!("{}", commands::notification(&e));
        std::process::exit(1);
    }

    Ok(())
}

fn build_client(settings: &Settings, state_dir: &StateDir) -> Result<ApiClient> {
    let store = FileSessionStore::new(settings.session_path(state_dir));

    ApiClientBuilder::from_config(&settings.api)
        .session_store(Arc::new(store))
        .on_session_expired(|| warn!("Session expired, stored tokens discarded"))
        .build()
        .context("Failed to create API client")
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
