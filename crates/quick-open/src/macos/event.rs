//! `NSEvent` to [`KeyEvent`] conversion.

use objc2_app_kit::{NSEvent, NSEventModifierFlags, NSEventType};
use quick_open_input::keycode::key_from_code;
use quick_open_input::{KeyEvent, Modifiers};

/// Converts a key-down or key-up `NSEvent` into a [`KeyEvent`].
pub fn key_event_from_ns_event(event: &NSEvent) -> KeyEvent {
    // SAFETY: key-down and key-up events always carry a key code and characters
    let code = unsafe { event.keyCode() };
    let chars = unsafe { event.charactersIgnoringModifiers() }.map(|s| s.to_string());
    let flags = unsafe { event.modifierFlags() };

    let modifiers = Modifiers {
        shift: flags.contains(NSEventModifierFlags::Shift),
        command: flags.contains(NSEventModifierFlags::Command),
        option: flags.contains(NSEventModifierFlags::Option),
        control: flags.contains(NSEventModifierFlags::Control),
    };

    KeyEvent::new(key_from_code(code, chars.as_deref()), modifiers)
}

/// Returns true for key-down events.
pub fn is_key_down(event: &NSEvent) -> bool {
    unsafe { event.r#type() } == NSEventType::KeyDown
}
