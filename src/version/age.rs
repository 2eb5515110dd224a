//! Relative age labels for the version list.

use chrono::{DateTime, Utc};

/// Describe how long ago `created_at` was, relative to `now`.
///
/// Timestamps in the future are reported as "just now".
pub fn time_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let units = [
        (365 * 24 * 60 * 60, "year"),
        (30 * 24 * 60 * 60, "month"),
        (24 * 60 * 60, "day"),
        (60 * 60, "hour"),
        (60, "minute"),
    ];

    for (unit_seconds, name) in units {
        let count = seconds / unit_seconds;
        if count >= 1 {
            let plural = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, name, plural);
        }
    }

    "just now".to_string()
}
