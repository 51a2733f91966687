//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{AppState, types::HealthResponse};
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use localsync_core::{
    LocalSyncError, document_from_bytes_with_limit, document_to_bytes,
    primitives::MAX_REQUEST_BODY_SIZE,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::ok(state.store.len()))
}

// =============================================================================
// SET HANDLER
// =============================================================================

/// Merge the request body into the document.
///
/// The body must be a JSON object. Anything else is a client error and
/// leaves the document untouched.
pub async fn set_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Unreadable /set body: {}", rejection);
            return (rejection.status(), "Error reading request").into_response();
        }
    };

    let partial = match document_from_bytes_with_limit(&body, MAX_REQUEST_BODY_SIZE) {
        Ok(partial) => partial,
        Err(e) => {
            tracing::warn!("Rejected /set body: {}", e);
            let status = match e {
                LocalSyncError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, "Error decoding JSON").into_response();
        }
    };

    tracing::debug!(keys = partial.len(), "Merging partial document");
    state.store.merge(partial);
    StatusCode::OK.into_response()
}

// =============================================================================
// GET HANDLER
// =============================================================================

/// Return the whole document as JSON.
pub async fn get_handler(State(state): State<AppState>) -> Response {
    let document = state.store.get();

    match document_to_bytes(&document) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode document: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error encoding JSON").into_response()
        }
    }
}
