//! Version Catalog
//!
//! Plain collection of every stored version, shared by the in-memory and
//! file backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    last_id: VersionId,
    #[serde(default)]
    versions: Vec<VersionRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions of a document, newest first.
    ///
    /// Ties on the timestamp are broken by id so later inserts still win.
    pub fn list(&self, document_id: DocumentId) -> Vec<VersionSummary> {
        let mut versions: Vec<&VersionRecord> = self
            .versions
            .iter()
            .filter(|record| record.document_id == document_id)
            .collect();
        versions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        versions.into_iter().map(VersionRecord::summary).collect()
    }

    pub fn get(&self, id: VersionId) -> Option<&VersionRecord> {
        self.versions.iter().find(|record| record.id == id)
    }

    /// Assign the next id and store the version
    pub fn insert(&mut self, request: NewVersion, created_at: DateTime<Utc>) -> VersionRecord {
        let next_id = self
            .versions
            .iter()
            .map(|record| record.id)
            .max()
            .unwrap_or(0)
            .max(self.last_id)
            + 1;
        self.last_id = next_id;

        let record = VersionRecord {
            id: next_id,
            document_id: request.document_id,
            subtitle: request.subtitle,
            content: Some(request.content),
            created_at,
        };
        self.versions.push(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
