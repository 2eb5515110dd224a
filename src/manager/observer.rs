//! Outputs towards the editor surface.

use chrono::{DateTime, Utc};

/// Receives every value the manager pushes to the editor surface
pub trait VersionObserver {
    /// New content for the caller-owned editor buffer
    fn content_changed(&mut self, content: &str);

    /// Subtitle label of the displayed version
    fn subtitle_changed(&mut self, subtitle: &str);

    /// Creation date label of the displayed version
    fn date_changed(&mut self, date: Option<DateTime<Utc>>);
}

/// Observer that keeps the last pushed values, as a simple editor would
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub content: String,
    pub subtitle: String,
    pub date: Option<DateTime<Utc>>,
    /// Number of times the manager rewrote the buffer
    pub content_writes: usize,
}

impl VersionObserver for ViewState {
    fn content_changed(&mut self, content: &str) {
        self.content = content.to_string();
        self.content_writes += 1;
    }

    fn subtitle_changed(&mut self, subtitle: &str) {
        self.subtitle = subtitle.to_string();
    }

    fn date_changed(&mut self, date: Option<DateTime<Utc>>) {
        self.date = date;
    }
}
