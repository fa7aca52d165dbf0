//! CLI command definitions and dispatch.

pub mod inbox;
pub mod migrate;
pub mod notify;
pub mod permission;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::output::OutputFormat;
use bizhub_core::config::{AppConfig, LoggingConfig};
use bizhub_core::error::AppError;

/// Bizhub: business permissions and notification fan-out
#[derive(Debug, Parser)]
#[command(name = "bizhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Permission checks and route inference
    Permission(permission::PermissionArgs),
    /// Create notifications and inspect recipients
    Notify(notify::NotifyArgs),
    /// A business user's notification inbox
    Inbox(inbox::InboxArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config)?;
        init_logging(&config.logging);

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Permission(args) => permission::execute(args, &config, self.format).await,
            Commands::Notify(args) => notify::execute(args, &config, self.format).await,
            Commands::Inbox(args) => inbox::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Initialize tracing from `RUST_LOG` or the configured level
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("Logging already initialised: {}", e);
    }
}
