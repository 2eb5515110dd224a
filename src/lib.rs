//! Document Versions
//!
//! Version history management for a single document in an editor.
//!
//! This library provides:
//! - The version selection and dirty-tracking state machine
//! - Guarded navigation and the version creation dialog
//! - Async storage backends (in-memory and JSON file)
//! - Configuration management

pub mod config;
pub mod input;
pub mod manager;
pub mod session;
pub mod store;
pub mod terminal;
pub mod test_utils;
pub mod version;

// Re-exports for a compact public API
pub use config::Config;
pub use input::{KeyChord, Keyboard, Shortcut};
pub use manager::{
    CreationState, ModalTarget, Prompt, Rejection, SelectionState, Switch, VersionManager,
    VersionObserver, ViewState,
};
pub use session::{Intent, Session};
pub use store::{FileBackend, MemoryBackend, StoreClient, StoreEvent, VersionBackend, VersionStore};
pub use version::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};
