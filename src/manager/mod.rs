//! Version Manager
//!
//! The state machine that reconciles the version listing, single-version
//! fetches, live editor content and user intents.
//!
//! Every public method is one named transition. Nothing here waits on I/O:
//! requests go out through [`VersionStore`] and their responses come back
//! later through [`VersionManager::versions_loaded`] and
//! [`VersionManager::version_loaded`].

pub mod creation;
pub mod dirty;
pub mod guard;
pub mod observer;
pub mod selection;

pub use creation::{CreationState, CreationWorkflow, ModalTarget};
pub use dirty::DirtyTracker;
pub use guard::{Messages, NavigationGuard, Prompt, Rejection, Switch};
pub use observer::{VersionObserver, ViewState};
pub use selection::{ActiveVersion, SelectionState};

use crate::input::{KeyChord, Shortcut};
use crate::store::VersionStore;
use crate::version::{
    DocumentId, NewVersion, VersionDirectory, VersionId, VersionRecord, VersionSummary,
};

/// Version history controller for the document shown in one editor
pub struct VersionManager<S, P, O> {
    store: S,
    prompt: P,
    observer: O,
    messages: Messages,
    save_shortcuts: Vec<Shortcut>,
    document_id: Option<DocumentId>,
    directory: VersionDirectory,
    active: ActiveVersion,
    dirty: DirtyTracker,
    guard: NavigationGuard,
    creation: CreationWorkflow,
}

impl<S, P, O> VersionManager<S, P, O>
where
    S: VersionStore,
    P: Prompt,
    O: VersionObserver,
{
    pub fn new(store: S, prompt: P, observer: O) -> Self {
        Self {
            store,
            prompt,
            observer,
            messages: Messages::default(),
            save_shortcuts: Shortcut::default_save(),
            document_id: None,
            directory: VersionDirectory::new(),
            active: ActiveVersion::new(),
            dirty: DirtyTracker::new(),
            guard: NavigationGuard::new(),
            creation: CreationWorkflow::new(),
        }
    }

    /// Use localized notice and confirmation texts
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Replace the key chords that count as "save"
    pub fn with_save_shortcuts(mut self, shortcuts: Vec<Shortcut>) -> Self {
        self.save_shortcuts = shortcuts;
        self
    }

    // Version Directory

    /// The caller switched to another document.
    ///
    /// Requests its listing and forgets everything tied to the previous one,
    /// so late responses for the old document are dropped. Re-opening the
    /// current document is a no-op; use [`Self::refresh_directory`].
    pub fn open_document(&mut self, document_id: DocumentId) {
        if self.document_id == Some(document_id) {
            log::debug!("Document {} is already open", document_id);
            return;
        }

        log::info!("Opening version history of document {}", document_id);
        self.document_id = Some(document_id);
        self.directory.clear();

        // Nothing of the previous document may survive the switch
        if self.creation.cancel() {
            log::debug!("Discarded version draft of the previous document");
        }
        self.active.clear();
        self.dirty.set_loaded(None);
        self.write_buffer("");
        self.push_labels();
        self.guard.reset();

        self.store.list_versions(document_id);
    }

    /// Fetch the listing of the current document again
    pub fn refresh_directory(&mut self) {
        self.guard.reset();
        if let Some(document_id) = self.document_id {
            log::debug!("Refreshing version listing of document {}", document_id);
            self.store.list_versions(document_id);
        }
    }

    /// A listing arrived. Returns `false` when it was stale and dropped.
    ///
    /// An applied listing always selects its newest version, even if an
    /// older one was on display before the refresh.
    pub fn versions_loaded(&mut self, document_id: DocumentId, versions: Vec<VersionSummary>) -> bool {
        if self.document_id != Some(document_id) {
            log::debug!("Dropping stale version listing for document {}", document_id);
            return false;
        }

        log::debug!("Document {} has {} versions", document_id, versions.len());
        self.directory.replace(document_id, versions);

        match self.directory.newest().cloned() {
            Some(newest) => self.select_version(&newest),
            None => {
                self.active.clear();
                self.dirty.set_loaded(None);
                self.write_buffer("");
                self.push_labels();
                self.guard.reset();
            }
        }
        true
    }

    // Active Version Tracker

    fn select_version(&mut self, version: &VersionSummary) {
        let Some(document_id) = self.document_id else {
            return;
        };

        log::debug!("Selecting version {} ({})", version.id, version.subtitle);
        self.active.select(document_id, version);
        self.push_labels();
        self.store.get_version(version.id);
    }

    /// Content for a version arrived. Returns `false` when it no longer
    /// matches the selection and was dropped.
    pub fn version_loaded(&mut self, record: VersionRecord) -> bool {
        if !self.active.accept(self.document_id, &record) {
            log::debug!(
                "Dropping stale content of version {} (document {})",
                record.id,
                record.document_id
            );
            return false;
        }

        // An empty body is still the loaded content; only an absent one
        // leaves nothing to compare against.
        self.dirty.set_loaded(record.content.clone());
        match record.usable_content() {
            Some(content) => {
                self.active.apply_record(&record);
                self.write_buffer(content);
            }
            None => {
                log::debug!("Version {} has no content", record.id);
                self.active.clear_labels();
                self.write_buffer("");
            }
        }
        self.push_labels();
        self.guard.reset();
        true
    }

    /// The user edited the buffer
    pub fn content_changed(&mut self, content: impl Into<String>) {
        let content = content.into();
        if self.dirty.buffer() == Some(content.as_str()) {
            return;
        }
        self.dirty.set_buffer(content);
        self.guard.reset();
    }

    pub fn collapse_comparator(&mut self) {
        self.guard.reset();
        self.active.collapse_comparator();
    }

    // Navigation Guard

    /// The user clicked a version in the list.
    ///
    /// With unsaved edits the user must confirm first; declining leaves
    /// every piece of state exactly as it was.
    pub fn click_version(&mut self, version_id: VersionId) -> Result<Switch, Rejection> {
        let version = self
            .directory
            .get(version_id)
            .cloned()
            .ok_or(Rejection::UnknownVersion { id: version_id })?;
        self.guard.reset();

        if self.is_dirty() && !self.prompt.confirm(&self.messages.discard_changes) {
            log::debug!("Switch to version {} declined", version_id);
            return Ok(Switch::Declined);
        }

        self.select_version(&version);
        self.active.expand_comparator();
        Ok(Switch::Switched)
    }

    /// Route a key press. Returns `true` when it was a save shortcut and
    /// should not reach the editor.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        if !self.save_shortcuts.iter().any(|s| s.matches(chord)) {
            self.guard.reset();
            return false;
        }
        if let Err(rejection) = self.request_save() {
            log::debug!("Save shortcut ignored: {}", rejection);
        }
        true
    }

    /// Save intent: open the creation modal if there is anything to save
    pub fn request_save(&mut self) -> Result<(), Rejection> {
        self.ensure_listed()?;
        if !self.is_dirty() {
            if self.guard.take_save_notice() {
                self.notify(&Rejection::NothingToSave);
            }
            return Err(Rejection::NothingToSave);
        }

        if self.creation.open() {
            log::debug!("Version dialog opened from save shortcut");
        }
        Ok(())
    }

    // Creation Workflow

    /// Explicit "add version" action
    pub fn add_version(&mut self) -> Result<(), Rejection> {
        self.guard.reset();
        self.ensure_listed()?;
        if !self.is_dirty() {
            return Err(self.reject(Rejection::NothingChanged));
        }

        if self.creation.open() {
            log::debug!("Version dialog opened");
        }
        Ok(())
    }

    pub fn set_subtitle(&mut self, text: &str) -> Result<(), Rejection> {
        self.creation.set_subtitle(text)
    }

    /// Close the modal and discard the draft
    pub fn cancel_creation(&mut self) -> bool {
        self.guard.reset();
        self.creation.cancel()
    }

    /// Only clicks on the backdrop itself dismiss the modal
    pub fn modal_click(&mut self, target: ModalTarget) -> bool {
        match target {
            ModalTarget::Backdrop => self.cancel_creation(),
            ModalTarget::Content => false,
        }
    }

    /// Commit the draft as a new version of the current buffer.
    ///
    /// The request is fire-and-forget: the new version shows up with the next
    /// directory refresh, never by inserting it here.
    pub fn submit(&mut self) -> Result<NewVersion, Rejection> {
        match self.creation.subtitle() {
            None => return Err(Rejection::DialogClosed),
            Some("") => return Err(self.reject(Rejection::SubtitleRequired)),
            Some(_) => {}
        }

        let Some(document_id) = self.document_id else {
            log::warn!("Cannot create a version without an open document");
            return Err(Rejection::NoDocument);
        };
        self.ensure_listed()?;

        let subtitle = self.creation.begin_commit()?;
        let request = NewVersion {
            subtitle,
            document_id,
            content: self.dirty.buffer().unwrap_or_default().to_string(),
        };
        log::info!(
            "Creating version '{}' of document {}",
            request.subtitle,
            document_id
        );
        self.store.create_version(request.clone());
        self.creation.finish_commit();
        self.guard.reset();
        Ok(request)
    }

    // Accessors

    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn directory(&self) -> &VersionDirectory {
        &self.directory
    }

    pub fn selection(&self) -> &SelectionState {
        self.active.selection()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Mirror of the editor buffer
    pub fn buffer(&self) -> Option<&str> {
        self.dirty.buffer()
    }

    pub fn creation_state(&self) -> &CreationState {
        self.creation.state()
    }

    /// Subtitle typed so far while the creation modal is open
    pub fn draft_subtitle(&self) -> Option<&str> {
        self.creation.subtitle()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    // Helpers

    /// Creation needs the listing of the open document, so that the buffer
    /// can only hold content that belongs to it.
    fn ensure_listed(&self) -> Result<(), Rejection> {
        match self.document_id {
            Some(document_id) if self.directory.document_id() != Some(document_id) => {
                log::debug!("Version listing of document {} is still loading", document_id);
                Err(Rejection::Loading)
            }
            _ => Ok(()),
        }
    }

    fn reject(&mut self, rejection: Rejection) -> Rejection {
        self.notify(&rejection);
        rejection
    }

    fn notify(&mut self, rejection: &Rejection) {
        if let Some(text) = self.messages.notice_for(rejection) {
            self.prompt.notify(text);
        }
    }

    fn write_buffer(&mut self, content: &str) {
        self.dirty.set_buffer(content.to_string());
        self.observer.content_changed(content);
    }

    fn push_labels(&mut self) {
        let selection = self.active.selection();
        self.observer.subtitle_changed(selection.selected_subtitle());
        self.observer.date_changed(selection.selected_date());
    }
}
