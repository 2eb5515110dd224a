//! Test doubles for driving a [`VersionManager`](crate::VersionManager)
//! without real storage or dialogs.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::manager::Prompt;
use crate::store::{StoreRequest, VersionStore};
use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

/// Store that only records what was asked of it
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub requests: Vec<StoreRequest>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create requests issued so far
    pub fn created(&self) -> Vec<&NewVersion> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                StoreRequest::CreateVersion(new_version) => Some(new_version),
                _ => None,
            })
            .collect()
    }

    /// Ids of the content fetches issued so far
    pub fn fetched(&self) -> Vec<VersionId> {
        self.requests
            .iter()
            .filter_map(|request| match request {
                StoreRequest::GetVersion(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl VersionStore for RecordingStore {
    fn list_versions(&mut self, document_id: DocumentId) {
        self.requests.push(StoreRequest::ListVersions(document_id));
    }

    fn get_version(&mut self, version_id: VersionId) {
        self.requests.push(StoreRequest::GetVersion(version_id));
    }

    fn create_version(&mut self, request: NewVersion) {
        self.requests.push(StoreRequest::CreateVersion(request));
    }
}

/// Prompt with pre-recorded answers that remembers every dialog shown
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    pub confirmations: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next confirmation
    pub fn answer(&mut self, proceed: bool) {
        self.answers.push_back(proceed);
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        // Unscripted confirmations are declined.
        self.answers.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Fixed timestamp so tests do not depend on the clock
pub fn timestamp(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(minutes)
}

pub fn summary(id: VersionId, subtitle: &str) -> VersionSummary {
    VersionSummary {
        id,
        subtitle: subtitle.to_string(),
        created_at: timestamp(id),
    }
}

pub fn record(document_id: DocumentId, id: VersionId, subtitle: &str, content: &str) -> VersionRecord {
    VersionRecord {
        id,
        document_id,
        subtitle: subtitle.to_string(),
        content: Some(content.to_string()),
        created_at: timestamp(id),
    }
}
