//! # Primitives
//!
//! Hardcoded names and limits for the LocalSync store.
//!
//! These are compiled into the binary and are immutable at runtime.

/// The reserved top-level key whose contents are merged with deduplication
/// instead of being overwritten.
pub const FAVORITE_KEY: &str = "favorite";

/// The favorite array whose elements are identified by their `"id"` field.
///
/// Every other favorite array is identified by the raw element value.
pub const CARD_KEY: &str = "card";

/// The field that carries a card's identity.
pub const CARD_ID_FIELD: &str = "id";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum accepted size of a persisted snapshot (512 MB).
///
/// Checked BEFORE parsing so a corrupted or hostile data file cannot force an
/// unbounded allocation during startup.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 512 * 1024 * 1024;

/// Maximum accepted size of a single merge request body (16 MB).
pub const MAX_REQUEST_BODY_SIZE: usize = 16 * 1024 * 1024;
