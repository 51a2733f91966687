//! # Persistence Format
//!
//! A snapshot is the document serialized as UTF-8 JSON. There is no header,
//! no envelope and no version field; any JSON object is a valid snapshot.
//!
//! File I/O lives in [`crate::store`]; this module only converts between
//! documents and bytes.
//!
//! ## Limits
//!
//! The payload size is checked against `MAX_PERSISTENCE_PAYLOAD_SIZE` BEFORE
//! parsing, so a corrupted data file is rejected without allocating for it.

use crate::primitives::MAX_PERSISTENCE_PAYLOAD_SIZE;
use crate::{Document, LocalSyncError};
use serde_json::Value;

/// Serialize a document to compact JSON bytes.
pub fn document_to_bytes(document: &Document) -> Result<Vec<u8>, LocalSyncError> {
    serde_json::to_vec(document).map_err(|e| LocalSyncError::Serialization(e.to_string()))
}

/// Deserialize a document from JSON bytes.
///
/// Rejects payloads over the size limit, malformed JSON, and well-formed JSON
/// whose top level is not an object.
pub fn document_from_bytes(bytes: &[u8]) -> Result<Document, LocalSyncError> {
    document_from_bytes_with_limit(bytes, MAX_PERSISTENCE_PAYLOAD_SIZE)
}

/// Deserialize a document, enforcing a caller-chosen size limit.
pub fn document_from_bytes_with_limit(
    bytes: &[u8],
    max_size: usize,
) -> Result<Document, LocalSyncError> {
    if bytes.len() > max_size {
        return Err(LocalSyncError::PayloadTooLarge {
            size: bytes.len(),
            max: max_size,
        });
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| LocalSyncError::Deserialization(format!("Invalid JSON: {}", e)))?;

    Document::try_from(value)
}

// =============================================================================
// TESTS
// =============================================================================
