//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::config::LocalSyncConfig;
use crate::persistence::{PersistenceController, SHUTDOWN_DRAIN_TIMEOUT, shutdown_signal};
use localsync_core::{DocumentStore, LocalSyncError};
use std::sync::Arc;

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server and run the persistence lifecycle around it.
///
/// 1. Load the data file (fatal on failure).
/// 2. Bind the listener, then start autosave.
/// 3. Serve until a termination signal arrives, draining for a bounded time.
/// 4. Write one final snapshot, even if serving failed.
pub async fn cmd_server(config: LocalSyncConfig) -> Result<(), LocalSyncError> {
    let store = Arc::new(DocumentStore::new());
    let controller = PersistenceController::from_config(Arc::clone(&store), &config);

    controller.load_initial()?;

    println!("LocalSync Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", config.bind_addr());
    println!("  Data:     {}", config.data.file.display());
    println!("  Plugins:  {}", config.data.plugins_dir.display());
    match config.autosave_interval() {
        Some(period) => println!("  Autosave: every {}s", period.as_secs()),
        None => println!("  Autosave: disabled"),
    }
    println!();
    println!("Endpoints:");
    println!("  POST /set       - Merge a JSON object into the document");
    println!("  GET  /get       - Fetch the document");
    println!("  GET  /health    - Health check");
    println!("  GET  /plugins/* - Plugin assets");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let listener = api::bind(&config.bind_addr()).await?;
    let state = AppState::new(store).with_plugins_dir(config.data.plugins_dir.clone());

    controller
        .serve_until(listener, state, shutdown_signal(), SHUTDOWN_DRAIN_TIMEOUT)
        .await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Summarize the data file without starting the server.
pub fn cmd_status(config: &LocalSyncConfig, json_mode: bool) -> Result<(), LocalSyncError> {
    let path = &config.data.file;
    let exists = path.exists();

    let store = DocumentStore::new();
    if exists {
        store.load_from_file(path)?;
    }
    let summary = store.get().summary();

    if json_mode {
        let output = serde_json::json!({
            "data_file": path.to_string_lossy(),
            "exists": exists,
            "key_count": summary.key_count,
            "favorites": summary.favorites,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("LocalSync Data Status");
    println!("=====================");
    println!("Data file: {}", path.display());
    if !exists {
        println!("(not created yet)");
    }
    println!();
    println!("Top-level keys: {}", summary.key_count);

    if summary.favorites.is_empty() {
        println!("Favorites:      none");
    } else {
        println!("Favorites:");
        for (name, count) in &summary.favorites {
            println!("  {:<12} {}", name, count);
        }
    }

    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective configuration.
pub fn cmd_config(config: &LocalSyncConfig) -> Result<(), LocalSyncError> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
