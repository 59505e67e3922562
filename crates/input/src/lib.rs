//!
//! Keyboard event types for the quick-open palette.
//!
//! These types abstract over macOS NSEvent details and provide a clean
//! Rust-native interface for key routing. The palette core only ever sees
//! [`KeyEvent`]s, so its navigation and selection logic can be exercised
//! without a windowing system.

pub mod keycode;

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: Key,
    /// Modifier keys held during the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new KeyEvent with the given key and modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a KeyEvent for a single character with no modifiers.
    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers::default(),
        }
    }

    /// Creates a KeyEvent for a character with control held (e.g. ctrl-n).
    pub fn control(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            modifiers: Modifiers {
                control: true,
                ..Default::default()
            },
        }
    }
}

/// Modifier keys that can be held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key
    pub shift: bool,
    /// Command key (Cmd/⌘)
    pub command: bool,
    /// Option key (Alt/⌥)
    pub option: bool,
    /// Control key (Ctrl/⌃)
    pub control: bool,
}

impl Modifiers {
    /// Returns true if no modifier keys are held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.command && !self.option && !self.control
    }
}

/// Keys that can be pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// A printable character, as produced ignoring modifiers
    Char(char),
    /// Backspace / Delete backward
    Backspace,
    /// Forward delete
    Delete,
    /// Return / Enter (main or keypad)
    Return,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// A key with no character and no dedicated variant, by virtual key code
    Other(u16),
}

impl Key {
    /// Returns true when this is the given letter, ignoring case.
    pub fn is_letter(&self, letter: char) -> bool {
        matches!(self, Key::Char(ch) if ch.eq_ignore_ascii_case(&letter))
    }
}
