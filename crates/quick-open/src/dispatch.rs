//!
//! Key routing for the palette as a transition function.
//!
//! Every key event is reduced to an [`InputClass`] and combined with the
//! current [`PaletteState`] to produce a [`PaletteAction`]. The presentation
//! controller only executes actions; it never inspects raw keys itself.
//!
//! | state \ input      | Dismiss      | Commit  | MoveUp/MoveDown | Text        |
//! |--------------------|--------------|---------|-----------------|-------------|
//! | `Hidden`           | PassThrough  | PassThrough | PassThrough | PassThrough |
//! | `ShownEmpty`       | ToggleWindow | Consume | Consume         | PassThrough |
//! | `ShownWithResults` | ToggleWindow | Commit  | MoveSelection   | PassThrough |

use quick_open_input::{Key, KeyEvent};

/// What a key means to the palette, independent of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// Escape
    Dismiss,
    /// Return or keypad enter
    Commit,
    /// Down arrow or ctrl-n
    MoveDown,
    /// Up arrow or ctrl-p
    MoveUp,
    /// Everything else; edits the search text
    Text,
}

/// The palette's presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteState {
    Hidden,
    ShownEmpty,
    ShownWithResults,
}

/// Direction of a selection move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Signed row offset for this direction.
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// What the presentation controller should do with a key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAction {
    /// Let the event reach the search field
    PassThrough,
    /// Swallow the event and do nothing
    Consume,
    /// Ask the window controller to toggle (close) the palette
    ToggleWindow,
    /// Commit the selected match
    Commit,
    /// Move the selection one row
    MoveSelection(Direction),
}

/// Classifies a key event.
pub fn classify(event: &KeyEvent) -> InputClass {
    let control = event.modifiers.control;

    match &event.key {
        Key::Escape => InputClass::Dismiss,
        Key::Return => InputClass::Commit,
        Key::Down => InputClass::MoveDown,
        Key::Up => InputClass::MoveUp,
        key if control && key.is_letter('n') => InputClass::MoveDown,
        key if control && key.is_letter('p') => InputClass::MoveUp,
        _ => InputClass::Text,
    }
}

/// Resolves a key-down event.
pub fn on_key_down(state: PaletteState, input: InputClass) -> PaletteAction {
    use PaletteState::*;

    match (state, input) {
        (Hidden, _) => PaletteAction::PassThrough,
        (_, InputClass::Text) => PaletteAction::PassThrough,
        (_, InputClass::Dismiss) => PaletteAction::ToggleWindow,
        (ShownWithResults, InputClass::Commit) => PaletteAction::Commit,
        (ShownWithResults, InputClass::MoveDown) => PaletteAction::MoveSelection(Direction::Down),
        (ShownWithResults, InputClass::MoveUp) => PaletteAction::MoveSelection(Direction::Up),
        (ShownEmpty, _) => PaletteAction::Consume,
    }
}

/// Returns true when a key-up of this class should re-run the query.
///
/// Navigation and control keys never reach the search text, so releasing
/// them must not trigger a new match.
pub fn requeries_on_key_up(input: InputClass) -> bool {
    input == InputClass::Text
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_open_input::Modifiers;

    fn key(key: Key) -> KeyEvent {
        KeyEvent::new(key, Modifiers::default())
    }

    // =========================================================================
    // classify
    // =========================================================================

    #[test]
    fn navigation_keys_classify() {
        assert_eq!(classify(&key(Key::Escape)), InputClass::Dismiss);
        assert_eq!(classify(&key(Key::Return)), InputClass::Commit);
        assert_eq!(classify(&key(Key::Down)), InputClass::MoveDown);
        assert_eq!(classify(&key(Key::Up)), InputClass::MoveUp);
    }

    #[test]
    fn control_n_and_p_navigate() {
        assert_eq!(classify(&KeyEvent::control('n')), InputClass::MoveDown);
        assert_eq!(classify(&KeyEvent::control('p')), InputClass::MoveUp);
    }

    #[test]
    fn plain_n_and_p_are_text() {
        assert_eq!(classify(&KeyEvent::char('n')), InputClass::Text);
        assert_eq!(classify(&KeyEvent::char('p')), InputClass::Text);
    }

    #[test]
    fn other_control_letters_are_text() {
        assert_eq!(classify(&KeyEvent::control('a')), InputClass::Text);
    }

    #[test]
    fn editing_keys_are_text() {
        assert_eq!(classify(&key(Key::Backspace)), InputClass::Text);
        assert_eq!(classify(&key(Key::Left)), InputClass::Text);
        assert_eq!(classify(&key(Key::Other(122))), InputClass::Text);
    }

    // =========================================================================
    // on_key_down
    // =========================================================================

    #[test]
    fn hidden_passes_everything_through() {
        for input in [
            InputClass::Dismiss,
            InputClass::Commit,
            InputClass::MoveDown,
            InputClass::MoveUp,
            InputClass::Text,
        ] {
            assert_eq!(
                on_key_down(PaletteState::Hidden, input),
                PaletteAction::PassThrough
            );
        }
    }

    #[test]
    fn escape_toggles_when_shown() {
        assert_eq!(
            on_key_down(PaletteState::ShownEmpty, InputClass::Dismiss),
            PaletteAction::ToggleWindow
        );
        assert_eq!(
            on_key_down(PaletteState::ShownWithResults, InputClass::Dismiss),
            PaletteAction::ToggleWindow
        );
    }

    #[test]
    fn navigation_is_swallowed_without_results() {
        assert_eq!(
            on_key_down(PaletteState::ShownEmpty, InputClass::Commit),
            PaletteAction::Consume
        );
        assert_eq!(
            on_key_down(PaletteState::ShownEmpty, InputClass::MoveDown),
            PaletteAction::Consume
        );
        assert_eq!(
            on_key_down(PaletteState::ShownEmpty, InputClass::MoveUp),
            PaletteAction::Consume
        );
    }

    #[test]
    fn navigation_acts_with_results() {
        assert_eq!(
            on_key_down(PaletteState::ShownWithResults, InputClass::Commit),
            PaletteAction::Commit
        );
        assert_eq!(
            on_key_down(PaletteState::ShownWithResults, InputClass::MoveDown),
            PaletteAction::MoveSelection(Direction::Down)
        );
        assert_eq!(
            on_key_down(PaletteState::ShownWithResults, InputClass::MoveUp),
            PaletteAction::MoveSelection(Direction::Up)
        );
    }

    #[test]
    fn text_passes_through_when_shown() {
        assert_eq!(
            on_key_down(PaletteState::ShownWithResults, InputClass::Text),
            PaletteAction::PassThrough
        );
    }

    #[test]
    fn only_text_requeries() {
        assert!(requeries_on_key_up(InputClass::Text));
        assert!(!requeries_on_key_up(InputClass::Dismiss));
        assert!(!requeries_on_key_up(InputClass::Commit));
        assert!(!requeries_on_key_up(InputClass::MoveDown));
        assert!(!requeries_on_key_up(InputClass::MoveUp));
    }

    #[test]
    fn direction_offsets() {
        assert_eq!(Direction::Up.offset(), -1);
        assert_eq!(Direction::Down.offset(), 1);
    }
}
