//! Keyboard Shortcuts
//!
//! Key chords, configurable save bindings and the scoped keyboard
//! subscription used by a mounted session.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tokio::sync::broadcast;

static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)((?:(?:ctrl|control|cmd|meta|super|alt|option|shift)\s*\+\s*)*)([a-z0-9])$")
        .expect("binding pattern is valid")
});

/// A single key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: char,
}

impl KeyChord {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            key,
            ..Self::default()
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            meta: true,
            key,
            ..Self::default()
        }
    }
}

/// Errors raised while parsing key binding strings
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Invalid key binding '{binding}'")]
    InvalidBinding { binding: String },

    #[error("Key binding '{binding}' has no modifier")]
    MissingModifier { binding: String },
}

/// A configured shortcut such as `ctrl+s` or `cmd+s`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    chord: KeyChord,
}

impl Shortcut {
    /// Whether a pressed chord triggers this shortcut.
    ///
    /// Every modifier of the binding must be held; extra modifiers are ignored.
    pub fn matches(&self, pressed: &KeyChord) -> bool {
        let wanted = &self.chord;
        pressed.key == wanted.key
            && (!wanted.ctrl || pressed.ctrl)
            && (!wanted.meta || pressed.meta)
            && (!wanted.alt || pressed.alt)
            && (!wanted.shift || pressed.shift)
    }

    /// The chord that triggers this shortcut with no extra modifiers
    pub fn chord(&self) -> KeyChord {
        self.chord
    }

    /// Platform-conventional save shortcuts: Ctrl+S and Cmd+S
    pub fn default_save() -> Vec<Shortcut> {
        vec![
            Shortcut {
                chord: KeyChord::ctrl('s'),
            },
            Shortcut {
                chord: KeyChord::meta('s'),
            },
        ]
    }

    /// Parse a list of binding strings
    pub fn parse_all<S: AsRef<str>>(bindings: &[S]) -> Result<Vec<Shortcut>, ShortcutError> {
        bindings.iter().map(|b| b.as_ref().parse()).collect()
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    fn from_str(binding: &str) -> Result<Self, Self::Err> {
        let trimmed = binding.trim();
        let captures = BINDING_RE
            .captures(trimmed)
            .ok_or_else(|| ShortcutError::InvalidBinding {
                binding: binding.to_string(),
            })?;

        let mut chord = KeyChord::default();
        let modifiers = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        for modifier in modifiers.split('+').map(str::trim).filter(|m| !m.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "alt" | "option" => chord.alt = true,
                "shift" => chord.shift = true,
                _ => {
                    return Err(ShortcutError::InvalidBinding {
                        binding: binding.to_string(),
                    });
                }
            }
        }

        if !(chord.ctrl || chord.meta || chord.alt) {
            return Err(ShortcutError::MissingModifier {
                binding: binding.to_string(),
            });
        }

        let key = captures
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .ok_or_else(|| ShortcutError::InvalidBinding {
                binding: binding.to_string(),
            })?;
        chord.key = key.to_ascii_lowercase();

        Ok(Shortcut { chord })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chord = &self.chord;
        if chord.ctrl {
            write!(f, "ctrl+")?;
        }
        if chord.meta {
            write!(f, "cmd+")?;
        }
        if chord.alt {
            write!(f, "alt+")?;
        }
        if chord.shift {
            write!(f, "shift+")?;
        }
        write!(f, "{}", chord.key)
    }
}

/// Source of key presses shared by every mounted listener
#[derive(Debug, Clone)]
pub struct Keyboard {
    tx: broadcast::Sender<KeyChord>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Deliver a key press to every live subscription
    pub fn press(&self, chord: KeyChord) {
        // No listener mounted: the press goes nowhere.
        let _ = self.tx.send(chord);
    }

    /// Register a listener; it stays registered until the subscription drops
    pub fn subscribe(&self) -> ShortcutSubscription {
        ShortcutSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Registration of one keyboard listener, released on drop
#[derive(Debug)]
pub struct ShortcutSubscription {
    rx: broadcast::Receiver<KeyChord>,
}

impl ShortcutSubscription {
    /// Take the next pending key press without waiting
    pub fn try_next(&mut self) -> Option<KeyChord> {
        loop {
            match self.rx.try_recv() {
                Ok(chord) => return Some(chord),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Keyboard listener fell behind, dropped {} key presses", skipped);
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next key press; `None` once the keyboard is gone
    pub async fn next(&mut self) -> Option<KeyChord> {
        loop {
            match self.rx.recv().await {
                Ok(chord) => return Some(chord),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Keyboard listener fell behind, dropped {} key presses", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
