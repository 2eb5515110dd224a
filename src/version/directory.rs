//! Version Directory
//!
//! The newest-first list of known versions for exactly one document.

use super::schema::{DocumentId, VersionId, VersionSummary};

/// In-memory list of versions belonging to a single document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionDirectory {
    document_id: Option<DocumentId>,
    versions: Vec<VersionSummary>,
}

/// A directory item prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry<'a> {
    pub version: &'a VersionSummary,
    pub is_selected: bool,
}

impl VersionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document the stored listing belongs to
    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    /// Replace the whole listing with a fresh one for `document_id`
    pub fn replace(&mut self, document_id: DocumentId, versions: Vec<VersionSummary>) {
        self.document_id = Some(document_id);
        self.versions = versions;
    }

    /// Forget the listing, e.g. when a different document is opened
    pub fn clear(&mut self) {
        self.document_id = None;
        self.versions.clear();
    }

    /// Most recent version (index 0)
    pub fn newest(&self) -> Option<&VersionSummary> {
        self.versions.first()
    }

    /// Look up a listed version by id
    pub fn get(&self, id: VersionId) -> Option<&VersionSummary> {
        self.versions.iter().find(|version| version.id == id)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionSummary> {
        self.versions.iter()
    }

    /// Listing with the currently selected version marked
    pub fn entries(&self, selected: Option<VersionId>) -> Vec<DirectoryEntry<'_>> {
        self.versions
            .iter()
            .map(|version| DirectoryEntry {
                version,
                is_selected: selected == Some(version.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn summary(id: VersionId, subtitle: &str) -> VersionSummary {
        VersionSummary {
            id,
            subtitle: subtitle.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, id as u32, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_directory_creation() {
        let directory = VersionDirectory::new();
        assert!(directory.is_empty());
        assert!(directory.newest().is_none());
        assert!(directory.document_id().is_none());
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut directory = VersionDirectory::new();
        directory.replace(4, vec![summary(3, "c"), summary(2, "b"), summary(1, "a")]);

        assert_eq!(directory.document_id(), Some(4));
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.newest().unwrap().id, 3);
        assert_eq!(directory.get(2).unwrap().subtitle, "b");
        assert!(directory.get(9).is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut directory = VersionDirectory::new();
        directory.replace(4, vec![summary(3, "c"), summary(2, "b")]);
        directory.replace(5, vec![summary(1, "a")]);

        assert_eq!(directory.document_id(), Some(5));
        assert_eq!(directory.len(), 1);
        assert!(directory.get(3).is_none());
    }

    #[test]
    fn test_entries_mark_selection() {
        let mut directory = VersionDirectory::new();
        directory.replace(4, vec![summary(2, "b"), summary(1, "a")]);

        let entries = directory.entries(Some(1));
        assert!(!entries[0].is_selected);
        assert!(entries[1].is_selected);

        assert!(directory.entries(None).iter().all(|e| !e.is_selected));
    }
}
