//! Mounted Session
//!
//! Wires a [`VersionManager`] to its event sources: store responses, the
//! keyboard, catalog file changes and caller intents. All of them are
//! handled one at a time on the calling task.

use tokio::sync::mpsc;

use crate::input::{Keyboard, ShortcutSubscription};
use crate::manager::{ModalTarget, Prompt, Rejection, VersionManager, VersionObserver};
use crate::store::{StoreClient, StoreEvent, VersionBackend, WatcherEvent};
use crate::version::{DocumentId, VersionId};

/// Something the user or the embedding editor asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    OpenDocument(DocumentId),
    EditContent(String),
    ClickVersion(VersionId),
    AddVersion,
    SetSubtitle(String),
    Submit,
    Cancel,
    ModalClick(ModalTarget),
    CollapseComparator,
    Refresh,
}

enum Wake {
    Store(Option<StoreEvent>),
    Key(Option<crate::input::KeyChord>),
    Watch(Option<WatcherEvent>),
    Intent(Option<Intent>),
}

pub struct Session<B, P, O> {
    manager: VersionManager<StoreClient<B>, P, O>,
    events: mpsc::UnboundedReceiver<StoreEvent>,
    shortcuts: ShortcutSubscription,
    changes: Option<mpsc::UnboundedReceiver<WatcherEvent>>,
}

impl<B, P, O> Session<B, P, O>
where
    B: VersionBackend,
    P: Prompt,
    O: VersionObserver,
{
    /// Mount the manager: registers exactly one keyboard listener, which is
    /// released when the session is dropped.
    pub fn mount(
        manager: VersionManager<StoreClient<B>, P, O>,
        events: mpsc::UnboundedReceiver<StoreEvent>,
        keyboard: &Keyboard,
    ) -> Self {
        Self {
            manager,
            events,
            shortcuts: keyboard.subscribe(),
            changes: None,
        }
    }

    /// Refresh the listing whenever the catalog changes on disk
    pub fn watch_changes(&mut self, changes: mpsc::UnboundedReceiver<WatcherEvent>) {
        self.changes = Some(changes);
    }

    pub fn manager(&self) -> &VersionManager<StoreClient<B>, P, O> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut VersionManager<StoreClient<B>, P, O> {
        &mut self.manager
    }

    /// Tear down, releasing the keyboard listener
    pub fn unmount(self) -> VersionManager<StoreClient<B>, P, O> {
        self.manager
    }

    /// Apply one caller intent
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), Rejection> {
        log::debug!("Intent: {:?}", intent);
        match intent {
            Intent::OpenDocument(document_id) => self.manager.open_document(document_id),
            Intent::EditContent(content) => self.manager.content_changed(content),
            Intent::ClickVersion(version_id) => {
                self.manager.click_version(version_id)?;
            }
            Intent::AddVersion => self.manager.add_version()?,
            Intent::SetSubtitle(text) => self.manager.set_subtitle(&text)?,
            Intent::Submit => {
                self.manager.submit()?;
            }
            Intent::Cancel => {
                self.manager.cancel_creation();
            }
            Intent::ModalClick(target) => {
                self.manager.modal_click(target);
            }
            Intent::CollapseComparator => self.manager.collapse_comparator(),
            Intent::Refresh => self.manager.refresh_directory(),
        }
        Ok(())
    }

    /// Apply every pending key press and store response until no request
    /// is left in flight
    pub async fn settle(&mut self) {
        loop {
            self.drain_keys();
            self.drain_changes();

            if self.manager.store().in_flight() == 0 {
                break;
            }
            match self.events.recv().await {
                Some(event) => self.handle_store_event(event),
                None => break,
            }
        }
    }

    /// Event loop for embedding: runs until the intent channel closes
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<Intent>) {
        let mut keys_open = true;

        loop {
            let wake = tokio::select! {
                event = self.events.recv() => Wake::Store(event),
                chord = self.shortcuts.next(), if keys_open => Wake::Key(chord),
                change = next_change(&mut self.changes) => Wake::Watch(change),
                intent = intents.recv() => Wake::Intent(intent),
            };

            match wake {
                Wake::Store(Some(event)) => self.handle_store_event(event),
                Wake::Store(None) => break,
                Wake::Key(Some(chord)) => {
                    self.manager.handle_key(&chord);
                }
                Wake::Key(None) => keys_open = false,
                Wake::Watch(Some(change)) => self.handle_watcher_event(change),
                Wake::Watch(None) => self.changes = None,
                Wake::Intent(Some(intent)) => {
                    if let Err(rejection) = self.dispatch(intent) {
                        log::debug!("Intent rejected: {}", rejection);
                    }
                }
                Wake::Intent(None) => break,
            }
        }
    }

    fn drain_keys(&mut self) {
        while let Some(chord) = self.shortcuts.try_next() {
            self.manager.handle_key(&chord);
        }
    }

    fn drain_changes(&mut self) {
        let mut changed = Vec::new();
        if let Some(changes) = self.changes.as_mut() {
            while let Ok(change) = changes.try_recv() {
                changed.push(change);
            }
        }
        for change in changed {
            self.handle_watcher_event(change);
        }
    }

    fn handle_store_event(&mut self, event: StoreEvent) {
        self.manager.store_mut().complete();

        match event {
            StoreEvent::VersionsListed {
                document_id,
                versions,
            } => {
                self.manager.versions_loaded(document_id, versions);
            }
            StoreEvent::VersionFetched(record) => {
                self.manager.version_loaded(record);
            }
            StoreEvent::VersionCreated(record) => {
                log::info!(
                    "Version {} '{}' created for document {}",
                    record.id,
                    record.subtitle,
                    record.document_id
                );
                if self.manager.document_id() == Some(record.document_id) {
                    self.manager.refresh_directory();
                }
            }
            StoreEvent::Failed { request, error } => {
                log::error!("Store request {:?} failed: {}", request, error);
            }
        }
    }

    fn handle_watcher_event(&mut self, event: WatcherEvent) {
        match event {
            WatcherEvent::CatalogChanged(path) => {
                log::info!("Version catalog changed: {}", path.display());
                self.manager.refresh_directory();
            }
            WatcherEvent::WatcherError(e) => {
                log::error!("Version catalog watcher error: {}", e);
            }
        }
    }
}

async fn next_change(changes: &mut Option<mpsc::UnboundedReceiver<WatcherEvent>>) -> Option<WatcherEvent> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
