//! Durable item cache
//!
//! This module defines the cache interface the download pool writes through
//! and the filesystem implementation used in production. A stored document
//! marks its item as done: later runs see it and skip the network entirely.

mod fs;

pub use fs::FsCache;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while storing a document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create save directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write document {}: {source}", path.display())]
    WriteDocument {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for cache operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for document cache backends
///
/// The cache is write-once per item id. There is no update or delete
/// surface; presence of a document is the idempotence key for the
/// whole pipeline.
pub trait DocumentCache: Send + Sync {
    /// Checks whether a document for this id is already stored
    fn exists(&self, id: &str) -> bool;

    /// Stores a document body under the given id
    ///
    /// Storing an id that already has a document leaves the stored
    /// document untouched.
    ///
    /// # Arguments
    ///
    /// * `id` - Site-assigned object id
    /// * `body` - Raw document text as fetched
    ///
    /// # Returns
    ///
    /// The path the document lives at
    fn store(&self, id: &str, body: &str) -> StoreResult<PathBuf>;

    /// Path a document for this id lives at, whether or not it exists yet
    fn path_for(&self, id: &str) -> PathBuf;
}
