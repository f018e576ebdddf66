//! Pledge CLI - crowdfunding platform client

mod commands;
mod logging;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use pledge_client::{DEFAULT_BASE_URL, FileSessionStore, PledgeClient};
use tracing::{Level, error};

#[derive(Parser)]
#[command(name = "pledge")]
#[command(about = "Client for the Pledge crowdfunding platform")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Backend origin to talk to
    #[arg(long, global = true, env = "PLEDGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory holding the stored session (defaults to the platform data dir)
    #[arg(short = 'd', long, global = true, env = "PLEDGE_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Timeout for requests in seconds
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.log_level.into())?;

    let session = match &cli.state_dir {
        Some(dir) => FileSessionStore::with_path(dir.join("session.json")),
        None => FileSessionStore::new(),
    };

    let client = PledgeClient::builder()
        .base_url(cli.base_url)
        .timeout(Duration::from_secs(cli.timeout))
        .session_store(Arc::new(session))
        .on_session_expired(|| {
            eprintln!("Your session has expired. Run `pledge login` to sign in again.");
        })
        .build()?;

    if let Err(e) = cli.command.execute(&client).await {
        error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
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
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
