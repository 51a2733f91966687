//! # LocalSync HTTP API Module
//!
//! This module implements the HTTP server using axum.
//!
//! ## Endpoints
//!
//! - `POST /set` - Merge a JSON object into the document
//! - `GET /get` - Return the whole document
//! - `GET /health` - Health check
//! - `GET /plugins/*` - Static plugin assets
//!
//! Every response carries permissive CORS headers and every `OPTIONS`
//! request is answered directly, so plugins running on any origin can reach
//! the server.

mod handlers;
mod middleware;
mod types;

// Re-export handlers and types for integration tests (via `localsync::api::*`)
pub use handlers::{get_handler, health_handler, set_handler};
pub use middleware::{
    JAVASCRIPT_CONTENT_TYPE, cors_middleware, needs_javascript_content_type,
    plugin_content_type_middleware,
};
pub use types::HealthResponse;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use localsync_core::{DocumentStore, LocalSyncError, primitives::MAX_REQUEST_BODY_SIZE};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The document store shared with the persistence tasks.
    pub store: Arc<DocumentStore>,
    /// Directory served under `/plugins/`; `None` disables the route.
    pub plugins_dir: Option<PathBuf>,
}

impl AppState {
    /// Create new app state around a store, without plugin assets.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            plugins_dir: None,
        }
    }

    /// Serve static plugin files from `dir`.
    #[must_use]
    pub fn with_plugins_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugins_dir = Some(dir.into());
        self
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - answers preflight, stamps headers on every response
/// 3. Body limit - caps `/set` payloads
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/set", post(handlers::set_handler))
        .route("/get", get(handlers::get_handler))
        .route("/health", get(handlers::health_handler))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE));

    if let Some(dir) = &state.plugins_dir {
        tracing::info!("Serving plugin assets from {}", dir.display());
        let plugins = Router::new()
            .nest_service("/plugins", ServeDir::new(dir))
            .layer(axum_middleware::from_fn(
                middleware::plugin_content_type_middleware,
            ));
        router = router.merge(plugins);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::cors_middleware)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind the listener. Fails before anything is served.
pub async fn bind(addr: &str) -> Result<TcpListener, LocalSyncError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| LocalSyncError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("LocalSync HTTP server listening on {}", addr);
    Ok(listener)
}

/// Serve on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), LocalSyncError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| LocalSyncError::Io(format!("Server error: {}", e)))
}
