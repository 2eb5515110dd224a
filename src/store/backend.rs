//! Async storage backends and their error type.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

/// Failures reported by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO errors while reading or writing the catalog file
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON
    #[error("Malformed catalog {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Version {id} not found")]
    VersionNotFound { id: VersionId },

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Asynchronous storage of version records
pub trait VersionBackend: Clone + Send + Sync + 'static {
    /// Newest-first listing, without content
    fn list_versions(
        &self,
        document_id: DocumentId,
    ) -> impl Future<Output = StoreResult<Vec<VersionSummary>>> + Send;

    /// Full record including content
    fn get_version(
        &self,
        version_id: VersionId,
    ) -> impl Future<Output = StoreResult<VersionRecord>> + Send;

    /// Store a new version and return it with its assigned id
    fn create_version(
        &self,
        request: NewVersion,
    ) -> impl Future<Output = StoreResult<VersionRecord>> + Send;
}
