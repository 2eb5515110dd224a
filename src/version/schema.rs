//! Version Records
//!
//! Plain data exchanged with the persistence store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a saved version
pub type VersionId = i64;

/// Identifier of the document whose history is being managed
pub type DocumentId = i64;

/// Full snapshot of a saved version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: VersionId,
    pub document_id: DocumentId,
    pub subtitle: String,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VersionRecord {
    /// Content that can be loaded into the editor.
    ///
    /// Absent and empty content are both treated as "no usable version".
    pub fn usable_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|content| !content.is_empty())
    }

    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            id: self.id,
            subtitle: self.subtitle.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing metadata for a version, without its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub id: VersionId,
    pub subtitle: String,
    pub created_at: DateTime<Utc>,
}

impl From<&VersionRecord> for VersionSummary {
    fn from(record: &VersionRecord) -> Self {
        record.summary()
    }
}

/// Request to persist the current editor content as a new version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVersion {
    pub subtitle: String,
    pub document_id: DocumentId,
    pub content: String,
}
