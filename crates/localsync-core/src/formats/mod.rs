//! # Formats
//!
//! Encoding of documents for snapshots. Pure transformations, no file I/O.

pub mod persistence;

pub use persistence::{document_from_bytes, document_from_bytes_with_limit, document_to_bytes};
