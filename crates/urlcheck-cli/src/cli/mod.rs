//! CLI for urlcheck.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urlcheck_core::config;
use urlcheck_core::storage::FileStore;

use commands::{run_check, run_session, run_status};

/// Top-level CLI for urlcheck.
#[derive(Debug, Parser)]
#[command(name = "urlcheck")]
#[command(about = "urlcheck: check URLs against a backend, throttled locally", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/urlcheck/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Throttle state file (default: ~/.local/state/urlcheck/storage.json).
    #[arg(long, global = true, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Read URLs from stdin, one per line, and check each one.
    Run {
        /// Answer every check locally instead of calling the endpoint.
        #[arg(long)]
        mock: bool,
    },

    /// Check a single URL and exit.
    Check {
        /// URL to check.
        url: String,

        /// Answer locally instead of calling the endpoint.
        #[arg(long)]
        mock: bool,
    },

    /// Show the request quota and any active throttle.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let store = match cli.state_file {
            Some(path) => FileStore::new(path),
            None => FileStore::open_default()?,
        };
        tracing::debug!("throttle state file: {}", store.path().display());

        match cli.command {
            CliCommand::Run { mock } => run_session(&cfg, store, mock).await?,
            CliCommand::Check { url, mock } => run_check(&cfg, store, &url, mock).await?,
            CliCommand::Status => run_status(&cfg, store)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
