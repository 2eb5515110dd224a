//! Store Client
//!
//! Bridges the manager's fire-and-forget requests to an async backend. Each
//! request runs as its own task; its outcome comes back on a channel as a
//! [`StoreEvent`], in whatever order the tasks finish.

use tokio::sync::mpsc;

use super::backend::{StoreError, VersionBackend};
use super::{StoreRequest, VersionStore};
use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

/// Outcome of one store request
#[derive(Debug)]
pub enum StoreEvent {
    VersionsListed {
        document_id: DocumentId,
        versions: Vec<VersionSummary>,
    },
    VersionFetched(VersionRecord),
    VersionCreated(VersionRecord),
    Failed {
        request: StoreRequest,
        error: StoreError,
    },
}

pub struct StoreClient<B> {
    backend: B,
    tx: mpsc::UnboundedSender<StoreEvent>,
    in_flight: usize,
}

impl<B: VersionBackend> StoreClient<B> {
    /// Create a client and the receiving end of its event channel
    pub fn new(backend: B) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            backend,
            tx,
            in_flight: 0,
        };
        (client, rx)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Requests whose event has not been consumed yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mark one event as consumed
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn dispatch(&mut self, request: StoreRequest) {
        log::debug!("Store request: {:?}", request);
        self.in_flight += 1;

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match request.clone() {
                StoreRequest::ListVersions(document_id) => backend
                    .list_versions(document_id)
                    .await
                    .map(|versions| StoreEvent::VersionsListed {
                        document_id,
                        versions,
                    }),
                StoreRequest::GetVersion(version_id) => backend
                    .get_version(version_id)
                    .await
                    .map(StoreEvent::VersionFetched),
                StoreRequest::CreateVersion(new_version) => backend
                    .create_version(new_version)
                    .await
                    .map(StoreEvent::VersionCreated),
            };
            let event = event.unwrap_or_else(|error| StoreEvent::Failed { request, error });
            // Receiver gone means the session was torn down.
            let _ = tx.send(event);
        });
    }
}

impl<B: VersionBackend> VersionStore for StoreClient<B> {
    fn list_versions(&mut self, document_id: DocumentId) {
        self.dispatch(StoreRequest::ListVersions(document_id));
    }

    fn get_version(&mut self, version_id: VersionId) {
        self.dispatch(StoreRequest::GetVersion(version_id));
    }

    fn create_version(&mut self, request: NewVersion) {
        self.dispatch(StoreRequest::CreateVersion(request));
    }
}
