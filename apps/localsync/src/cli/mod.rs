//! # LocalSync CLI Module
//!
//! This module implements the CLI interface for LocalSync.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default)
//! - `status` - Summarize the data file
//! - `config` - Print the effective configuration

mod commands;

use crate::config::{ConfigOverrides, LocalSyncConfig};
use clap::{Parser, Subcommand};
use localsync_core::LocalSyncError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// LocalSync - plugin state server
///
/// Keeps one JSON document for client-side plugins, merges what they push,
/// serves it back, and snapshots it to disk.
#[derive(Parser, Debug)]
#[command(name = "localsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "LOCALSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data file (overrides `[data] file`)
    #[arg(short = 'D', long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory served under /plugins/
        #[arg(long)]
        plugins_dir: Option<PathBuf>,

        /// Seconds between autosaves (0 disables)
        #[arg(long)]
        autosave_secs: Option<u64>,
    },

    /// Summarize the data file
    Status,

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Load the config file and apply every override given on the command line.
    pub fn resolve_config(&self) -> Result<LocalSyncConfig, LocalSyncError> {
        let mut overrides = ConfigOverrides {
            data_file: self.data_file.clone(),
            ..ConfigOverrides::default()
        };

        if let Some(Commands::Server {
            host,
            port,
            plugins_dir,
            autosave_secs,
        }) = &self.command
        {
            overrides.host = host.clone();
            overrides.port = *port;
            overrides.plugins_dir = plugins_dir.clone();
            overrides.autosave_secs = *autosave_secs;
        }

        Ok(LocalSyncConfig::load(self.config.as_deref())?.with_overrides(overrides))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LocalSyncError> {
    let config = cli.resolve_config()?;

    match cli.command {
        Some(Commands::Server { .. }) | None => cmd_server(config).await,
        Some(Commands::Status) => cmd_status(&config, cli.json_mode),
        Some(Commands::Config) => cmd_config(&config),
    }
}
