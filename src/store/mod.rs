//! Persistence
//!
//! The manager talks to storage through [`VersionStore`], a set of
//! fire-and-forget requests. [`StoreClient`] implements it on top of any
//! async [`VersionBackend`] and reports results as [`StoreEvent`]s.

pub mod backend;
pub mod catalog;
pub mod client;
pub mod file;
pub mod memory;

pub use backend::{StoreError, StoreResult, VersionBackend};
pub use catalog::Catalog;
pub use client::{StoreClient, StoreEvent};
pub use file::{FileBackend, WatcherEvent};
pub use memory::MemoryBackend;

use crate::version::{DocumentId, NewVersion, VersionId};

/// Requests issued by the version manager. Responses arrive later as
/// separate events; nothing here returns a result.
pub trait VersionStore {
    /// Ask for the newest-first listing of a document
    fn list_versions(&mut self, document_id: DocumentId);

    /// Ask for the full content of one version
    fn get_version(&mut self, version_id: VersionId);

    /// Persist a new version
    fn create_version(&mut self, request: NewVersion);
}

/// A request as issued, useful for logging and test doubles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    ListVersions(DocumentId),
    GetVersion(VersionId),
    CreateVersion(NewVersion),
}
