//! JSON file backend
//!
//! Keeps the whole catalog in a single JSON file. Every operation reads the
//! file again, so edits made by other processes are always visible; a
//! watcher reports those edits so the open listing can be refreshed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{Mutex, mpsc};

use super::backend::{StoreError, StoreResult, VersionBackend};
use super::catalog::Catalog;
use crate::version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};

/// Events from the catalog file watcher
#[derive(Debug)]
pub enum WatcherEvent {
    CatalogChanged(PathBuf),
    WatcherError(notify::Error),
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: Arc<PathBuf>,
    /// Serializes read-modify-write cycles of this process
    write_lock: Arc<Mutex<()>>,
}

impl FileBackend {
    /// Use the catalog at `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog; a missing file is an empty catalog
    pub async fn load(&self) -> StoreResult<Catalog> {
        let content = match tokio::fs::read_to_string(self.path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Catalog::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Catalog::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.to_path_buf(),
            source,
        })
    }

    async fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(catalog).map_err(|source| StoreError::Json {
            path: self.path.to_path_buf(),
            source,
        })?;

        // Write next to the target and rename, so readers never see half a file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp_path, self.path())
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.to_path_buf(),
            source,
        }
    }

    /// Watch the catalog file for changes made outside this backend.
    ///
    /// The returned watcher must be kept alive for as long as events are wanted.
    pub fn watch(&self, tx: mpsc::UnboundedSender<WatcherEvent>) -> StoreResult<RecommendedWatcher> {
        let target = self.path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if path.file_name().map(|name| name.to_os_string()) == target {
                                let _ = tx.send(WatcherEvent::CatalogChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        log::info!("Watching version catalog {}", self.path.display());
        Ok(watcher)
    }
}

impl VersionBackend for FileBackend {
    async fn list_versions(&self, document_id: DocumentId) -> StoreResult<Vec<VersionSummary>> {
        Ok(self.load().await?.list(document_id))
    }

    async fn get_version(&self, version_id: VersionId) -> StoreResult<VersionRecord> {
        self.load()
            .await?
            .get(version_id)
            .cloned()
            .ok_or(StoreError::VersionNotFound { id: version_id })
    }

    async fn create_version(&self, request: NewVersion) -> StoreResult<VersionRecord> {
        let _guard = self.write_lock.lock().await;

        let mut catalog = self.load().await?;
        let record = catalog.insert(request, Utc::now());
        self.save(&catalog).await?;

        log::debug!(
            "Saved version {} of document {} to {}",
            record.id,
            record.document_id,
            self.path.display()
        );
        Ok(record)
    }
}
