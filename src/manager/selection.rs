//! Active Version Tracker
//!
//! Which version is on display, and which content fetch may still update it.

use chrono::{DateTime, Utc};

use crate::version::{DocumentId, VersionId, VersionRecord, VersionSummary};

/// What the user is currently looking at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_version_id: Option<VersionId>,
    selected_subtitle: String,
    selected_date: Option<DateTime<Utc>>,
    comparator_expanded: bool,
}

impl SelectionState {
    /// `None` when no version is selected or the directory is empty
    pub fn selected_version_id(&self) -> Option<VersionId> {
        self.selected_version_id
    }

    pub fn selected_subtitle(&self) -> &str {
        &self.selected_subtitle
    }

    pub fn selected_date(&self) -> Option<DateTime<Utc>> {
        self.selected_date
    }

    pub fn comparator_expanded(&self) -> bool {
        self.comparator_expanded
    }
}

/// A content fetch whose response may still be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFetch {
    document_id: DocumentId,
    version_id: VersionId,
}

/// Selection plus the bookkeeping needed to reject stale content responses
#[derive(Debug, Default)]
pub struct ActiveVersion {
    selection: SelectionState,
    pending: Option<PendingFetch>,
}

impl ActiveVersion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Select `version` from listing metadata and expect its content next
    pub fn select(&mut self, document_id: DocumentId, version: &VersionSummary) {
        self.selection.selected_version_id = Some(version.id);
        self.selection.selected_subtitle = version.subtitle.clone();
        self.selection.selected_date = Some(version.created_at);
        self.pending = Some(PendingFetch {
            document_id,
            version_id: version.id,
        });
    }

    pub fn expand_comparator(&mut self) {
        self.selection.comparator_expanded = true;
    }

    pub fn collapse_comparator(&mut self) {
        self.selection.comparator_expanded = false;
    }

    /// Whether `record` answers the fetch for the current selection.
    ///
    /// Consumes the pending fetch when it does, so a duplicate response for
    /// the same version cannot overwrite edits made after the first one.
    pub fn accept(&mut self, current_document: Option<DocumentId>, record: &VersionRecord) -> bool {
        let expected = PendingFetch {
            document_id: record.document_id,
            version_id: record.id,
        };
        let fresh = self.pending == Some(expected)
            && current_document == Some(record.document_id)
            && self.selection.selected_version_id == Some(record.id);
        if fresh {
            self.pending = None;
        }
        fresh
    }

    /// Overwrite the labels with the authoritative record
    pub fn apply_record(&mut self, record: &VersionRecord) {
        self.selection.selected_subtitle = record.subtitle.clone();
        self.selection.selected_date = Some(record.created_at);
    }

    /// Clear the labels but keep the selected id
    pub fn clear_labels(&mut self) {
        self.selection.selected_subtitle.clear();
        self.selection.selected_date = None;
    }

    /// Nothing selected at all, and no fetch may land anymore
    pub fn clear(&mut self) {
        self.selection.selected_version_id = None;
        self.clear_labels();
        self.pending = None;
    }
}
