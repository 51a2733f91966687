//! # Persistence Controller
//!
//! Drives the document's lifecycle on disk:
//!
//! - **Startup**: an existing data file must load, or the server never starts.
//! - **Autosave**: a background task snapshots the store on a fixed period.
//!   A failed save is logged and retried on the next tick.
//! - **Shutdown**: after a termination signal the server stops accepting
//!   connections and open ones get [`SHUTDOWN_DRAIN_TIMEOUT`] to finish.
//!   Autosave is stopped, then one final snapshot is written whether or not
//!   the drain completed. A failure is logged and the process exits anyway.
//!
//! This is the only place that traps termination signals.

use crate::api::{self, AppState};
use crate::config::LocalSyncConfig;
use localsync_core::{DocumentStore, LocalSyncError};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How long open connections may keep the server alive after a termination
/// signal before the final snapshot is taken regardless.
pub const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the data file path and the autosave period for one store.
#[derive(Debug, Clone)]
pub struct PersistenceController {
    store: Arc<DocumentStore>,
    data_file: PathBuf,
    autosave: Option<Duration>,
}

impl PersistenceController {
    /// Create a controller. `autosave = None` disables periodic snapshots.
    #[must_use]
    pub fn new(
        store: Arc<DocumentStore>,
        data_file: impl Into<PathBuf>,
        autosave: Option<Duration>,
    ) -> Self {
        Self {
            store,
            data_file: data_file.into(),
            autosave,
        }
    }

    /// Create a controller from the `[data]` section of the configuration.
    #[must_use]
    pub fn from_config(store: Arc<DocumentStore>, config: &LocalSyncConfig) -> Self {
        Self::new(store, config.data.file.clone(), config.autosave_interval())
    }

    /// The store being persisted.
    #[must_use]
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// The snapshot file.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Load the data file into the store if it exists.
    ///
    /// Returns `Ok(false)` when there is no file and the store stays empty.
    /// Any read or parse failure is returned to the caller, which must not
    /// start serving.
    pub fn load_initial(&self) -> Result<bool, LocalSyncError> {
        if !self.data_file.exists() {
            tracing::info!(
                "No data file at {}, starting with an empty document",
                self.data_file.display()
            );
            return Ok(false);
        }

        self.store.load_from_file(&self.data_file)?;
        tracing::info!(
            keys = self.store.len(),
            "Loaded document from {}",
            self.data_file.display()
        );
        Ok(true)
    }

    /// Write one snapshot on the blocking pool.
    pub async fn snapshot(&self) -> Result<(), LocalSyncError> {
        save_blocking(Arc::clone(&self.store), self.data_file.clone()).await
    }

    /// Start the periodic snapshot task.
    ///
    /// Returns `None` when autosave is disabled. The first snapshot happens
    /// one full period after the call.
    pub fn spawn_autosave(&self) -> Option<Autosave> {
        let period = self.autosave?;
        let store = Arc::clone(&self.store);
        let path = self.data_file.clone();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        tracing::info!("Autosave every {}s to {}", period.as_secs(), path.display());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                // Not raced against the stop signal: a save in progress finishes.
                match save_blocking(Arc::clone(&store), path.clone()).await {
                    Ok(()) => tracing::debug!("Autosaved document to {}", path.display()),
                    Err(e) => tracing::error!("Autosave failed: {}", e),
                }
            }
            tracing::debug!("Autosave stopped");
        });

        Some(Autosave {
            stop: stop_tx,
            handle,
        })
    }

    /// Best-effort snapshot on the way out. Never fails.
    pub async fn final_snapshot(&self) {
        match self.snapshot().await {
            Ok(()) => tracing::info!("Saved document to {}", self.data_file.display()),
            Err(e) => tracing::error!("Error saving on shutdown: {}", e),
        }
    }

    /// Run the server with autosave until `signal` resolves, then shut down.
    ///
    /// After the signal, open connections get `drain` to finish. Autosave is
    /// then stopped (waiting for a save in progress) and the final snapshot
    /// is written, so the snapshot always happens and this always returns.
    pub async fn serve_until<F>(
        &self,
        listener: TcpListener,
        state: AppState,
        signal: F,
        drain: Duration,
    ) -> Result<(), LocalSyncError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let autosave = self.spawn_autosave();
        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let shutdown = async move {
            signal.await;
            let _ = signalled_tx.send(());
        };

        let server = api::serve(listener, state, shutdown);
        tokio::pin!(server);

        let served = tokio::select! {
            result = &mut server => result,
            () = drain_deadline(signalled_rx, drain) => {
                tracing::warn!(
                    "Connections still open {}ms after shutdown signal, not waiting",
                    drain.as_millis()
                );
                Ok(())
            }
        };

        if let Some(autosave) = autosave {
            autosave.stop().await;
        }
        self.final_snapshot().await;

        served
    }
}

/// Handle to a running autosave task.
#[derive(Debug)]
pub struct Autosave {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Stop the task and wait for it, including any save already running.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            tracing::error!("Autosave task failed: {}", e);
        }
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Resolve `drain` after the shutdown signal fires. Never resolves if the
/// signal is dropped unfired, which only happens once the server is done.
async fn drain_deadline(signalled: oneshot::Receiver<()>, drain: Duration) {
    if signalled.await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(drain).await;
}

async fn save_blocking(store: Arc<DocumentStore>, path: PathBuf) -> Result<(), LocalSyncError> {
    tokio::task::spawn_blocking(move || store.save_to_file(&path))
        .await
        .map_err(|e| LocalSyncError::Io(format!("Snapshot task failed: {}", e)))?
}

// =============================================================================
// TERMINATION SIGNAL
// =============================================================================

/// Resolve once Ctrl+C or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Termination signal received, shutting down");
}

// =============================================================================
// TESTS
// =============================================================================
