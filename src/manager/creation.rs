//! Creation Workflow
//!
//! The modal that collects a subtitle before a new version is committed.

use super::guard::Rejection;

/// Modal state. `Committing` only exists while the create request is
/// being handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CreationState {
    #[default]
    Closed,
    Open {
        subtitle: String,
    },
    Committing,
}

/// Where a click inside the open modal landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTarget {
    /// The dimmed area around the dialog
    Backdrop,
    /// Anything inside the dialog itself
    Content,
}

#[derive(Debug, Default)]
pub struct CreationWorkflow {
    state: CreationState,
}

impl CreationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CreationState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, CreationState::Open { .. })
    }

    /// Draft subtitle while the modal is open
    pub fn subtitle(&self) -> Option<&str> {
        match &self.state {
            CreationState::Open { subtitle } => Some(subtitle),
            _ => None,
        }
    }

    /// Open with an empty draft. Returns `false` if already open, leaving
    /// the draft untouched.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = CreationState::Open {
            subtitle: String::new(),
        };
        true
    }

    pub fn set_subtitle(&mut self, text: &str) -> Result<(), Rejection> {
        match &mut self.state {
            CreationState::Open { subtitle } => {
                subtitle.clear();
                subtitle.push_str(text);
                Ok(())
            }
            _ => Err(Rejection::DialogClosed),
        }
    }

    /// Discard the draft. Returns `false` if nothing was open.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = CreationState::Closed;
        true
    }

    /// Validate the draft and move to `Committing`, yielding the subtitle
    pub fn begin_commit(&mut self) -> Result<String, Rejection> {
        let subtitle = match &self.state {
            CreationState::Open { subtitle } if subtitle.is_empty() => {
                return Err(Rejection::SubtitleRequired);
            }
            CreationState::Open { subtitle } => subtitle.clone(),
            _ => return Err(Rejection::DialogClosed),
        };
        self.state = CreationState::Committing;
        Ok(subtitle)
    }

    pub fn finish_commit(&mut self) {
        self.state = CreationState::Closed;
    }
}
