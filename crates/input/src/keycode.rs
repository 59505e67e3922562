//! macOS virtual key codes and their mapping to [`Key`].
//!
//! Key codes identify physical keys independent of keyboard layout, which is
//! what the palette's navigation bindings are defined against.

use crate::Key;

/// Return key
pub const RETURN: u16 = 36;
/// Tab key
pub const TAB: u16 = 48;
/// Delete (backspace) key
pub const DELETE: u16 = 51;
/// Escape key
pub const ESCAPE: u16 = 53;
/// Enter key on the numeric keypad
pub const KEYPAD_ENTER: u16 = 76;
/// Forward delete key
pub const FORWARD_DELETE: u16 = 117;
/// Left arrow
pub const LEFT_ARROW: u16 = 123;
/// Right arrow
pub const RIGHT_ARROW: u16 = 124;
/// Down arrow
pub const DOWN_ARROW: u16 = 125;
/// Up arrow
pub const UP_ARROW: u16 = 126;
/// The `n` key (ANSI layout)
pub const N: u16 = 45;
/// The `p` key (ANSI layout)
pub const P: u16 = 35;

/// Maps a virtual key code to a [`Key`].
///
/// `chars` is the event's characters with modifiers ignored. Codes without a
/// dedicated variant become `Key::Char` of the first character, or
/// `Key::Other(code)` when the event carries no character.
///
/// `n` and `p` map by key code rather than by character so that ctrl-n and
/// ctrl-p navigate regardless of what the active layout produces for them.
pub fn key_from_code(code: u16, chars: Option<&str>) -> Key {
    match code {
        RETURN | KEYPAD_ENTER => Key::Return,
        TAB => Key::Tab,
        DELETE => Key::Backspace,
        ESCAPE => Key::Escape,
        FORWARD_DELETE => Key::Delete,
        LEFT_ARROW => Key::Left,
        RIGHT_ARROW => Key::Right,
        DOWN_ARROW => Key::Down,
        UP_ARROW => Key::Up,
        N => Key::Char('n'),
        P => Key::Char('p'),
        _ => match chars.and_then(|s| s.chars().next()) {
            // Function keys report private-use characters; treat them as keys
            Some(ch) if !ch.is_control() && !('\u{F700}'..='\u{F8FF}').contains(&ch) => {
                Key::Char(ch)
            }
            _ => Key::Other(code),
        },
    }
}
