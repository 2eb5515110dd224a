//! User Input
//!
//! Keyboard shortcut handling.

pub mod keys;

pub use keys::{KeyChord, Keyboard, Shortcut, ShortcutError, ShortcutSubscription};
