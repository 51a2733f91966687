//! # API Response Types
//!
//! `/set` and `/get` speak raw JSON documents; only the health check has a
//! fixed response shape.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of top-level keys in the document.
    pub keys: usize,
}

impl HealthResponse {
    /// Healthy response for a document with `keys` top-level keys.
    #[must_use]
    pub fn ok(keys: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            keys,
        }
    }
}
