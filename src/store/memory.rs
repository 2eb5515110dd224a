//! In-process backend for tests and embedding.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::backend::{StoreError, StoreResult, VersionBackend};
use super::catalog::Catalog;
use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    catalog: Arc<RwLock<Catalog>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Copy of the current catalog
    pub async fn snapshot(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    /// Replace the whole catalog, e.g. after reloading it from disk
    pub async fn replace(&self, catalog: Catalog) {
        *self.catalog.write().await = catalog;
    }
}

impl VersionBackend for MemoryBackend {
    async fn list_versions(&self, document_id: DocumentId) -> StoreResult<Vec<VersionSummary>> {
        Ok(self.catalog.read().await.list(document_id))
    }

    async fn get_version(&self, version_id: VersionId) -> StoreResult<VersionRecord> {
        self.catalog
            .read()
            .await
            .get(version_id)
            .cloned()
            .ok_or(StoreError::VersionNotFound { id: version_id })
    }

    async fn create_version(&self, request: NewVersion) -> StoreResult<VersionRecord> {
        let record = self.catalog.write().await.insert(request, Utc::now());
        log::debug!(
            "Stored version {} of document {}",
            record.id,
            record.document_id
        );
        Ok(record)
    }
}
