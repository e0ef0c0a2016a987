// Currency Basics - Configuration
// Command line / environment settings for the client and the API server

use crate::api::DEFAULT_API_URL;
use crate::currency::CurrencyCategory;
use crate::error::{CurrencyError, Result};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE: &str = "currencies.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:3001";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Browse crypto and fiat currency lists
#[derive(Debug, Parser)]
#[command(name = "currency-basics", version, about)]
pub struct ClientArgs {
    #[command(flatten)]
    pub options: ClientOptions,

    #[command(subcommand)]
    pub command: Option<ClientCommand>,
}

#[derive(Debug, Clone, Args)]
pub struct ClientOptions {
    /// Base URL of the currency API
    #[arg(long, env = "CURRENCY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// SQLite file holding the local snapshot (defaults to the platform data dir)
    #[arg(long, env = "CURRENCY_DB")]
    pub db: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CURRENCY_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommand {
    /// Interactive terminal UI (default)
    Ui,
    /// Fetch both lists from the API and store them locally
    Insert,
    /// Remove the local snapshot
    Clear,
    /// Print a stored list, optionally filtered
    List {
        /// crypto, fiat or all
        category: CurrencyCategory,
        /// Search query, matched like the UI search box
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print record count and server status
    Status,
}

/// Resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub db_path: PathBuf,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_options(options: &ClientOptions) -> Result<Self> {
        let config = Self {
            api_url: options.api_url.clone(),
            db_path: options.db.clone().unwrap_or_else(default_db_path),
            timeout: Duration::from_secs(options.timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(CurrencyError::Config(format!(
                "api url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }

        if self.timeout.is_zero() || self.timeout > Duration::from_secs(300) {
            return Err(CurrencyError::Config(
                "timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }

    /// Log file kept next to the database, so the TUI screen stays clean
    pub fn log_path(&self) -> PathBuf {
        self.db_path.with_extension("log")
    }
}

/// Platform data directory, falling back to the working directory
pub fn default_db_path() -> PathBuf {
    ProjectDirs::from("", "", "currency-basics")
        .map(|dirs| dirs.data_dir().join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

/// Serve the currency lists over HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "currency-server", version, about)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "CURRENCY_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Directory holding currencyListA.json and currencyListB.json
    #[arg(long, env = "CURRENCY_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

impl ServerArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            return Err(CurrencyError::Config(format!(
                "data directory {} does not exist",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}
