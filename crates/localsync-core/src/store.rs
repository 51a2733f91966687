//! # Document Store
//!
//! Owns the single authoritative [`Document`] and guards it with one
//! reader/writer lock.
//!
//! ## Locking
//!
//! - `get`, `len`, `to_bytes` and the encode half of `save_to_file` take the
//!   shared lock; any number of them run concurrently.
//! - `merge`, `replace` and the swap half of `load_from_file` take the
//!   exclusive lock.
//! - File reads and writes happen outside the lock. Only the
//!   parse/encode/merge step runs inside a critical section.
//! - Saves are serialized by a separate save lock, held across encode, write
//!   and rename. Snapshots reach disk in the order they were taken, and a
//!   save never blocks readers or merges for longer than the encode.
//!
//! Nothing returned by the store aliases its internal state, so no caller can
//! observe a document mid-mutation.

use crate::formats::{document_from_bytes, document_to_bytes};
use crate::{Document, LocalSyncError, MergeEngine};
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// The shared, lock-guarded document.
#[derive(Debug, Default)]
pub struct DocumentStore {
    document: RwLock<Document>,
    save_lock: Mutex<()>,
}

impl DocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a document.
    #[must_use]
    pub fn with_document(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            save_lock: Mutex::new(()),
        }
    }

    /// Deep copy of the current document.
    #[must_use]
    pub fn get(&self) -> Document {
        self.document.read().clone()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.read().len()
    }

    /// Whether the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.read().is_empty()
    }

    /// Merge a partial document into the current one.
    pub fn merge(&self, partial: Document) {
        let mut document = self.document.write();
        MergeEngine::merge_into(&mut document, partial);
    }

    /// Replace the current document wholesale.
    pub fn replace(&self, document: Document) {
        *self.document.write() = document;
    }

    /// Encode a consistent snapshot of the current document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LocalSyncError> {
        let document = self.document.read();
        document_to_bytes(&document)
    }

    /// Parse bytes and replace the current document with the result.
    ///
    /// On error the current document is left untouched.
    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<(), LocalSyncError> {
        let document = document_from_bytes(bytes)?;
        self.replace(document);
        Ok(())
    }

    /// Read a snapshot file and replace the current document with it.
    ///
    /// The document is replaced, not merged. Whether to call this when the
    /// file is missing is the caller's decision; a missing file is an error
    /// here.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<(), LocalSyncError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LocalSyncError::Io(format!("Read data file '{}': {}", path.display(), e))
        })?;
        self.load_from_bytes(&bytes)
    }

    /// Write a snapshot of the current document, fully replacing the file.
    ///
    /// The bytes go to a uniquely named temporary file in the target's
    /// directory, which is then renamed over the target. Concurrent calls
    /// are serialized; each one succeeds and the last snapshot taken wins.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LocalSyncError> {
        let path = path.as_ref();
        let _saving = self.save_lock.lock();
        let bytes = self.to_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            LocalSyncError::Io(format!("Create snapshot in '{}': {}", dir.display(), e))
        })?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| {
                LocalSyncError::Io(format!("Write snapshot '{}': {}", tmp.path().display(), e))
            })?;
        // Dropping the error's file handle removes the temporary file.
        tmp.persist(path).map_err(|e| {
            LocalSyncError::Io(format!("Replace data file '{}': {}", path.display(), e.error))
        })?;

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
