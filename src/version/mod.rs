//! Version Data
//!
//! Records, listings and display helpers for saved document versions.

pub mod age;
pub mod directory;
pub mod schema;

pub use age::time_since;
pub use directory::{DirectoryEntry, VersionDirectory};
pub use schema::{DocumentId, NewVersion, VersionId, VersionRecord, VersionSummary};
