//! # localsync-core
//!
//! The document engine for LocalSync - THE STORE.
//!
//! LocalSync keeps a single JSON object in memory on behalf of client-side
//! plugins. Plugins push partial documents, pull the whole document back, and
//! the server snapshots it to disk.
//!
//! ## Layers
//!
//! - `merge` - pure functions combining an incoming partial document into an
//!   existing one (the `"favorite"` namespace is deduplicated, everything else
//!   is last-write-wins)
//! - `store` - `DocumentStore`, the reader/writer-locked authoritative document
//! - `formats` - JSON encoding of a document for snapshots (no file I/O)
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never logs; the app layer decides what is worth reporting
//! - Merge never fails for well-formed JSON

// =============================================================================
// MODULES
// =============================================================================

pub mod document;
pub mod error;
pub mod fingerprint;
pub mod formats;
pub mod merge;
pub mod primitives;
pub mod store;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use document::{Document, DocumentSummary};
pub use error::LocalSyncError;
pub use fingerprint::Fingerprint;
pub use formats::{document_from_bytes, document_from_bytes_with_limit, document_to_bytes};
pub use merge::MergeEngine;
pub use store::DocumentStore;

/// Re-exported so callers can build documents without naming `serde_json` themselves.
pub use serde_json::{Map, Value};
