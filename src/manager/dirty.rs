//! Dirty Tracker
//!
//! Mirror of the editor buffer and the loaded version content. Dirtiness is
//! always derived from the two, never stored.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirtyTracker {
    buffer: Option<String>,
    loaded: Option<String>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current editor buffer, `None` before the caller provided one
    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    /// Content of the loaded version, `None` when no usable version is loaded
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    pub fn set_buffer(&mut self, content: String) {
        self.buffer = Some(content);
    }

    pub fn set_loaded(&mut self, content: Option<String>) {
        self.loaded = content;
    }

    /// `true` when the buffer differs from the loaded version.
    ///
    /// With nothing loaded every buffer counts as a change, so a document
    /// without history can still get its first version.
    pub fn is_dirty(&self) -> bool {
        match (&self.loaded, &self.buffer) {
            (Some(loaded), Some(buffer)) => loaded != buffer,
            _ => true,
        }
    }
}
