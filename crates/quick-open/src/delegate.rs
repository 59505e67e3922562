//!
//! The host-supplied side of the palette.
//!
//! The palette knows nothing about what it is searching. Matching, row
//! rendering and what happens on selection all belong to the host, which
//! implements [`QuickOpenDelegate`] for its own item type.

/// Matching, rendering and selection callbacks supplied by the host.
///
/// All methods run synchronously on the main thread. A slow
/// [`matches_for_query`](Self::matches_for_query) stalls the palette; the
/// host is responsible for keeping it fast.
pub trait QuickOpenDelegate<T> {
    /// The renderable used for one row of the match list.
    type Row;

    /// Returns the candidates for the current search text, in display order.
    fn matches_for_query(&mut self, query: &str) -> Vec<T>;

    /// Builds the row for one candidate. `None` renders an empty row.
    fn view_for_item(&mut self, item: &T) -> Option<Self::Row>;

    /// Called once when the user commits a selection.
    fn on_item_selected(&mut self, item: &T);

    /// Called once each time a visible palette window is closed.
    fn on_window_closed(&mut self) {}
}
