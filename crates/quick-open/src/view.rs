//!
//! The platform side of the presentation controller.
//!
//! Following a humble-view split, [`PresentationController`] holds all the
//! palette's state and decisions, and drives a [`PaletteView`] that only
//! mirrors that state into native widgets. The macOS shell implements this
//! trait with AppKit views; tests implement it with plain structs.
//!
//! [`PresentationController`]: crate::presenter::PresentationController

use crate::layout::{Frame, Size};

/// The palette's visual tree: search field, match list and hosting window.
pub trait PaletteView {
    /// The renderable placed in one list row.
    type Row;

    /// Current contents of the search field.
    fn search_text(&self) -> String;

    /// Replaces the contents of the search field.
    fn set_search_text(&mut self, text: &str);

    /// Gives keyboard focus to the search field.
    fn focus_search_field(&mut self);

    /// Replaces every row of the match list. `None` rows are drawn empty.
    fn reload_rows(&mut self, rows: Vec<Option<Self::Row>>);

    /// Highlights a row of the match list.
    fn select_row(&mut self, index: usize);

    /// Scrolls the match list so the row is visible.
    fn scroll_row_to_visible(&mut self, index: usize);

    /// Resizes the palette's content view and backdrop.
    fn set_content_size(&mut self, size: Size);

    /// Sets the spacing between the search field and the match list.
    fn set_stack_spacing(&mut self, spacing: f64);

    /// Frame of the hosting window, or `None` when the view has no window.
    fn window_frame(&self) -> Option<Frame>;

    /// Moves and resizes the hosting window.
    fn set_window_frame(&mut self, frame: Frame);
}
