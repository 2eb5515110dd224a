//! Navigation Guard
//!
//! Confirmation and notice plumbing for intents that could lose unsaved
//! edits, plus the user-visible rejection taxonomy.

use serde::Deserialize;
use thiserror::Error;

use crate::version::VersionId;

/// Blocking user dialogs, injected so decisions stay testable
pub trait Prompt {
    /// Ask a yes/no question; `true` means proceed
    fn confirm(&mut self, message: &str) -> bool;

    /// Show an informational notice
    fn notify(&mut self, message: &str);
}

/// Why an intent was refused. The state machine does not transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// "Add version" with nothing changed
    #[error("no changes to add as a version")]
    NothingChanged,

    /// Save shortcut with nothing changed
    #[error("nothing to save")]
    NothingToSave,

    /// Submit with an empty subtitle
    #[error("version subtitle is required")]
    SubtitleRequired,

    /// Submit with no document open
    #[error("no document is open")]
    NoDocument,

    /// Modal interaction while the creation modal is closed
    #[error("version creation dialog is not open")]
    DialogClosed,

    /// Creation intent before the current document's listing arrived
    #[error("version history is still loading")]
    Loading,
    #[error("version {id} is not listed for the current document")]
    UnknownVersion { id: VersionId },
}

/// Outcome of a version-switch intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Selection moved and a content fetch was issued
    Switched,
    /// User declined discarding edits; nothing changed
    Declined,
}

/// User-facing texts. Loaded from configuration so they can be localized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub nothing_changed: String,
    pub nothing_to_save: String,
    pub subtitle_required: String,
    pub discard_changes: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            nothing_changed: "There are no changes to save as a version.".to_string(),
            nothing_to_save: "Nothing has been modified.".to_string(),
            subtitle_required: "Please enter a version name.".to_string(),
            discard_changes:
                "Your changes will not be saved. Do you really want to switch versions?"
                    .to_string(),
        }
    }
}

impl Messages {
    /// Notice shown for a rejection, if it is user-visible
    pub fn notice_for(&self, rejection: &Rejection) -> Option<&str> {
        match rejection {
            Rejection::NothingChanged => Some(&self.nothing_changed),
            Rejection::NothingToSave => Some(&self.nothing_to_save),
            Rejection::SubtitleRequired => Some(&self.subtitle_required),
            Rejection::NoDocument
            | Rejection::DialogClosed
            | Rejection::Loading
            | Rejection::UnknownVersion { .. } => None,
        }
    }
}

/// Gate state for the save shortcut
///
/// Consecutive save presses with nothing changed raise a single notice. Any
/// other intent, an edit or a newly loaded version re-arms it.
#[derive(Debug, Default)]
pub struct NavigationGuard {
    save_notice_shown: bool,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a "nothing to save" notice should be raised now
    pub fn take_save_notice(&mut self) -> bool {
        !std::mem::replace(&mut self.save_notice_shown, true)
    }

    /// Re-arm the notice after any input other than a save press
    pub fn reset(&mut self) {
        self.save_notice_shown = false;
    }
}
