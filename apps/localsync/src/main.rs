//! # LocalSync
//!
//! Entry point for the LocalSync server and its maintenance commands.
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server (the default command)
//! localsync server --port 8181 --plugins-dir ./plugins
//!
//! # Inspect the data file
//! localsync status -D data.json
//!
//! # Show the effective configuration
//! localsync --config localsync.toml config
//! ```

use clap::Parser;
use localsync::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. LOCALSYNC_LOG_FORMAT=json switches to JSON lines.
    let log_format = std::env::var("LOCALSYNC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_level = if cli.verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("localsync={log_level},tower_http=debug").into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
