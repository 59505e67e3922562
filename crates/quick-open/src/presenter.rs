//!
//! The palette's presentation controller.
//!
//! [`PresentationController`] owns the displayed candidates and the index of
//! the highlighted one, turns key events into navigation and selection via
//! [`dispatch`](crate::dispatch), and keeps a [`PaletteView`] in sync.
//!
//! It never reaches up into the window. When the user asks for the palette
//! to close (escape or a committed selection) the controller records a
//! [`WindowRequest`] that the window controller collects with
//! [`take_request`](PresentationController::take_request) after dispatch.
//!
//! # Selection invariant
//!
//! `selected` is `None` whenever the candidate list is empty and always a
//! valid index otherwise. Moves that would leave the list are dropped; the
//! selection neither wraps nor clamps.

use std::rc::Rc;

use quick_open_input::KeyEvent;

use crate::delegate::QuickOpenDelegate;
use crate::dispatch::{self, PaletteAction, PaletteState};
use crate::layout;
use crate::options::PaletteOptions;
use crate::view::PaletteView;

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event was consumed by the palette
    Yes,
    /// The event was not handled and should continue to the search field
    No,
}

/// A request from the presentation controller to its window controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    /// Close the palette if it is open, open it otherwise
    Toggle,
}

/// Presentation controller for the palette, generic over the host's item type.
pub struct PresentationController<T, V> {
    options: Rc<PaletteOptions>,
    view: V,
    /// Candidates currently displayed, in delegate order.
    matches: Vec<T>,
    /// Index into `matches` of the highlighted candidate.
    selected: Option<usize>,
    /// Request left for the window controller by the last event.
    pending_request: Option<WindowRequest>,
}

impl<T, V: PaletteView> PresentationController<T, V> {
    /// Creates a controller with no matches and no selection.
    pub fn new(options: Rc<PaletteOptions>, view: V) -> Self {
        Self {
            options,
            view,
            matches: Vec::new(),
            selected: None,
            pending_request: None,
        }
    }

    /// Returns the presentation state for the given window visibility.
    pub fn state(&self, visible: bool) -> PaletteState {
        if !visible {
            PaletteState::Hidden
        } else if self.matches.is_empty() {
            PaletteState::ShownEmpty
        } else {
            PaletteState::ShownWithResults
        }
    }

    /// The candidates currently displayed.
    pub fn matches(&self) -> &[T] {
        &self.matches
    }

    /// Index of the highlighted candidate, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The highlighted candidate, if any.
    pub fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|index| self.matches.get(index))
    }

    pub fn options(&self) -> &PaletteOptions {
        &self.options
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Takes the pending window request, clearing it.
    pub fn take_request(&mut self) -> Option<WindowRequest> {
        self.pending_request.take()
    }

    /// Resets per-session state after the window has been ordered front.
    ///
    /// The search field is always cleared. Matches are cleared too unless
    /// `persist_matches` is set, in which case the previous session's list
    /// and selection are kept as they were.
    pub fn did_become_visible<D>(&mut self, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        self.view.set_search_text("");

        if !self.options.persist_matches {
            self.clear_matches(delegate);
        }

        self.view.focus_search_field();
    }

    /// Handles a key-down event.
    ///
    /// Returns [`Handled::No`] for keys that should reach the search field
    /// and for every key while the palette is hidden.
    pub fn handle_key_down<D>(
        &mut self,
        event: &KeyEvent,
        visible: bool,
        delegate: Option<&mut D>,
    ) -> Handled
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        let input = dispatch::classify(event);

        match dispatch::on_key_down(self.state(visible), input) {
            PaletteAction::PassThrough => Handled::No,
            PaletteAction::Consume => Handled::Yes,
            PaletteAction::ToggleWindow => {
                self.pending_request = Some(WindowRequest::Toggle);
                Handled::Yes
            }
            PaletteAction::Commit => {
                self.commit(delegate);
                Handled::Yes
            }
            PaletteAction::MoveSelection(direction) => {
                if let Some(current) = self.selected {
                    let target = current as isize + direction.offset();
                    if target < 0 || !self.select(target as usize) {
                        tracing::trace!(current, ?direction, "selection move out of range dropped");
                    }
                }
                Handled::Yes
            }
        }
    }

    /// Handles a key-up event, re-running the query when the search text may
    /// have changed.
    pub fn handle_key_up<D>(&mut self, event: &KeyEvent, visible: bool, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        if !visible {
            return;
        }

        if dispatch::requeries_on_key_up(dispatch::classify(event)) {
            self.requery(delegate);
        }
    }

    /// Handles a click on a list row.
    ///
    /// A single click highlights the row; a double click highlights it and
    /// commits. Clicks on rows outside the list are ignored.
    pub fn handle_row_click<D>(&mut self, row: usize, click_count: u32, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        if !self.select(row) {
            return;
        }

        if click_count >= 2 {
            self.commit(delegate);
        }
    }

    /// Asks the delegate for matches for the current search text and redraws.
    ///
    /// Skipped entirely when there is no delegate.
    pub fn requery<D>(&mut self, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        let Some(delegate) = delegate else {
            return;
        };

        let query = self.view.search_text();
        self.matches = delegate.matches_for_query(&query);
        tracing::debug!(
            query_len = query.chars().count(),
            results = self.matches.len(),
            "palette requery"
        );

        self.reload_matches(Some(delegate));
    }

    /// Commits the highlighted candidate.
    ///
    /// Informs the delegate, then requests that the window close. Does
    /// nothing when there is no selection.
    pub fn commit<D>(&mut self, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        let Some(index) = self.selected else {
            return;
        };
        let Some(item) = self.matches.get(index) else {
            return;
        };

        tracing::debug!(index, "palette commit");
        if let Some(delegate) = delegate {
            delegate.on_item_selected(item);
        }

        self.pending_request = Some(WindowRequest::Toggle);
    }

    /// Highlights a candidate and scrolls it into view.
    ///
    /// Returns false, leaving the selection unchanged, when `index` is outside
    /// the candidate list.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.matches.len() {
            return false;
        }

        self.selected = Some(index);
        self.view.scroll_row_to_visible(index);
        self.view.select_row(index);
        true
    }

    // =========================================================================
    // List management
    // =========================================================================

    fn clear_matches<D>(&mut self, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        self.matches.clear();
        self.reload_matches(delegate);
    }

    fn reload_matches<D>(&mut self, delegate: Option<&mut D>)
    where
        D: QuickOpenDelegate<T, Row = V::Row>,
    {
        let rows: Vec<Option<V::Row>> = match delegate {
            Some(delegate) => self
                .matches
                .iter()
                .map(|item| delegate.view_for_item(item))
                .collect(),
            None => self.matches.iter().map(|_| None).collect(),
        };
        self.view.reload_rows(rows);
        self.update_view_size();

        self.selected = None;
        if !self.matches.is_empty() {
            self.select(0);
        }
    }

    fn update_view_size(&mut self) {
        let count = self.matches.len();
        let size = layout::palette_size(&self.options, count);

        self.view.set_stack_spacing(layout::stack_spacing(count));

        let Some(frame) = self.view.window_frame() else {
            return;
        };

        self.view.set_content_size(size);
        self.view.set_window_frame(layout::anchor_top(frame, size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Frame, Size};
    use quick_open_input::{Key, Modifiers};

    // =========================================================================
    // Test doubles
    // =========================================================================

    #[derive(Default)]
    struct TestView {
        text: String,
        rows: Vec<Option<String>>,
        highlighted: Option<usize>,
        frame: Option<Frame>,
        spacing: f64,
        focused: bool,
    }

    impl PaletteView for TestView {
        type Row = String;

        fn search_text(&self) -> String {
            self.text.clone()
        }

        fn set_search_text(&mut self, text: &str) {
            self.text = text.to_string();
        }

        fn focus_search_field(&mut self) {
            self.focused = true;
        }

        fn reload_rows(&mut self, rows: Vec<Option<String>>) {
            self.rows = rows;
            self.highlighted = None;
        }

        fn select_row(&mut self, index: usize) {
            self.highlighted = Some(index);
        }

        fn scroll_row_to_visible(&mut self, _index: usize) {}

        fn set_content_size(&mut self, _size: Size) {}

        fn set_stack_spacing(&mut self, spacing: f64) {
            self.spacing = spacing;
        }

        fn window_frame(&self) -> Option<Frame> {
            self.frame
        }

        fn set_window_frame(&mut self, frame: Frame) {
            self.frame = Some(frame);
        }
    }

    /// Returns `count` numbered matches for any non-empty query.
    struct Numbers {
        count: usize,
        selected: Vec<usize>,
    }

    impl Numbers {
        fn new(count: usize) -> Self {
            Self {
                count,
                selected: Vec::new(),
            }
        }
    }

    impl QuickOpenDelegate<usize> for Numbers {
        type Row = String;

        fn matches_for_query(&mut self, query: &str) -> Vec<usize> {
            if query.is_empty() {
                Vec::new()
            } else {
                (0..self.count).collect()
            }
        }

        fn view_for_item(&mut self, item: &usize) -> Option<String> {
            // Odd rows have no view
            (item % 2 == 0).then(|| format!("row {}", item))
        }

        fn on_item_selected(&mut self, item: &usize) {
            self.selected.push(*item);
        }
    }

    fn controller() -> PresentationController<usize, TestView> {
        let view = TestView {
            frame: Some(Frame::new(0.0, 500.0, 500.0, 48.0)),
            ..Default::default()
        };
        PresentationController::new(Rc::new(PaletteOptions::default()), view)
    }

    fn type_query(
        controller: &mut PresentationController<usize, TestView>,
        delegate: &mut Numbers,
        text: &str,
    ) {
        controller.view_mut().set_search_text(text);
        let last = text.chars().last().unwrap_or('x');
        controller.handle_key_up(&KeyEvent::char(last), true, Some(delegate));
    }

    fn down() -> KeyEvent {
        KeyEvent::new(Key::Down, Modifiers::default())
    }

    fn up() -> KeyEvent {
        KeyEvent::new(Key::Up, Modifiers::default())
    }

    fn enter() -> KeyEvent {
        KeyEvent::new(Key::Return, Modifiers::default())
    }

    // =========================================================================
    // Querying
    // =========================================================================

    #[test]
    fn new_controller_is_empty() {
        let controller = controller();
        assert!(controller.matches().is_empty());
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.state(true), PaletteState::ShownEmpty);
        assert_eq!(controller.state(false), PaletteState::Hidden);
    }

    #[test]
    fn requery_selects_first_match() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        type_query(&mut controller, &mut delegate, "a");

        assert_eq!(controller.matches(), &[0, 1, 2]);
        assert_eq!(controller.selected(), Some(0));
        assert_eq!(controller.view().highlighted, Some(0));
        assert_eq!(controller.state(true), PaletteState::ShownWithResults);
    }

    #[test]
    fn requery_builds_rows_through_delegate() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        type_query(&mut controller, &mut delegate, "a");

        assert_eq!(
            controller.view().rows,
            vec![Some("row 0".to_string()), None, Some("row 2".to_string())]
        );
    }

    #[test]
    fn requery_to_empty_clears_selection() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        type_query(&mut controller, &mut delegate, "a");
        type_query(&mut controller, &mut delegate, "");

        assert!(controller.matches().is_empty());
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.view().spacing, 0.0);
    }

    #[test]
    fn requery_resizes_window_from_top() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        type_query(&mut controller, &mut delegate, "a");

        let frame = controller.view().frame.unwrap();
        assert_eq!(frame.height, 48.0 + 3.0 * 42.0);
        assert_eq!(frame.top(), 548.0);
        assert_eq!(controller.view().spacing, layout::RESULT_SPACING);
    }

    #[test]
    fn requery_without_window_still_updates_matches() {
        let mut controller = controller();
        controller.view_mut().frame = None;
        let mut delegate = Numbers::new(2);

        type_query(&mut controller, &mut delegate, "a");

        assert_eq!(controller.matches().len(), 2);
        assert_eq!(controller.view().frame, None);
    }

    #[test]
    fn requery_without_delegate_is_noop() {
        let mut controller = controller();
        controller.view_mut().set_search_text("a");
        controller.requery::<Numbers>(None);

        assert!(controller.matches().is_empty());
    }

    #[test]
    fn navigation_key_up_does_not_requery() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");
        controller.handle_key_down(&down(), true, Some(&mut delegate));

        controller.handle_key_up(&down(), true, Some(&mut delegate));
        controller.handle_key_up(&KeyEvent::control('n'), true, Some(&mut delegate));

        // A requery would have reset the selection to 0
        assert_eq!(controller.selected(), Some(1));
    }

    #[test]
    fn key_up_while_hidden_is_ignored() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        controller.view_mut().set_search_text("a");

        controller.handle_key_up(&KeyEvent::char('a'), false, Some(&mut delegate));

        assert!(controller.matches().is_empty());
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn down_and_up_move_selection() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        assert_eq!(controller.handle_key_down(&down(), true, Some(&mut delegate)), Handled::Yes);
        assert_eq!(controller.selected(), Some(1));

        controller.handle_key_down(&KeyEvent::control('n'), true, Some(&mut delegate));
        assert_eq!(controller.selected(), Some(2));

        controller.handle_key_down(&KeyEvent::control('p'), true, Some(&mut delegate));
        assert_eq!(controller.selected(), Some(1));

        controller.handle_key_down(&up(), true, Some(&mut delegate));
        assert_eq!(controller.selected(), Some(0));
    }

    #[test]
    fn up_from_first_is_dropped() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        controller.handle_key_down(&up(), true, Some(&mut delegate));

        assert_eq!(controller.selected(), Some(0));
    }

    #[test]
    fn down_from_last_is_dropped() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        for _ in 0..5 {
            controller.handle_key_down(&down(), true, Some(&mut delegate));
        }

        assert_eq!(controller.selected(), Some(2));
    }

    #[test]
    fn navigation_without_results_is_consumed() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        assert_eq!(controller.handle_key_down(&down(), true, Some(&mut delegate)), Handled::Yes);
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn text_keys_pass_through() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        let handled = controller.handle_key_down(&KeyEvent::char('a'), true, Some(&mut delegate));

        assert_eq!(handled, Handled::No);
    }

    #[test]
    fn keys_pass_through_while_hidden() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        let escape = KeyEvent::new(Key::Escape, Modifiers::default());

        let handled = controller.handle_key_down(&escape, false, Some(&mut delegate));

        assert_eq!(handled, Handled::No);
        assert_eq!(controller.take_request(), None);
    }

    #[test]
    fn escape_requests_toggle() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        let escape = KeyEvent::new(Key::Escape, Modifiers::default());

        controller.handle_key_down(&escape, true, Some(&mut delegate));

        assert_eq!(controller.take_request(), Some(WindowRequest::Toggle));
        assert_eq!(controller.take_request(), None);
    }

    // =========================================================================
    // Commit
    // =========================================================================

    #[test]
    fn enter_commits_selected_item() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");
        controller.handle_key_down(&down(), true, Some(&mut delegate));

        controller.handle_key_down(&enter(), true, Some(&mut delegate));

        assert_eq!(delegate.selected, vec![1]);
        assert_eq!(controller.take_request(), Some(WindowRequest::Toggle));
    }

    #[test]
    fn enter_without_results_does_not_commit() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);

        controller.handle_key_down(&enter(), true, Some(&mut delegate));

        assert!(delegate.selected.is_empty());
        assert_eq!(controller.take_request(), None);
    }

    #[test]
    fn commit_without_delegate_still_requests_close() {
        let mut controller = controller();
        let mut delegate = Numbers::new(2);
        type_query(&mut controller, &mut delegate, "a");

        controller.commit::<Numbers>(None);

        assert_eq!(controller.take_request(), Some(WindowRequest::Toggle));
    }

    #[test]
    fn single_click_selects_row() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        controller.handle_row_click(2, 1, Some(&mut delegate));

        assert_eq!(controller.selected(), Some(2));
        assert!(delegate.selected.is_empty());
        assert_eq!(controller.take_request(), None);
    }

    #[test]
    fn double_click_commits_row() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        controller.handle_row_click(2, 2, Some(&mut delegate));

        assert_eq!(delegate.selected, vec![2]);
        assert_eq!(controller.take_request(), Some(WindowRequest::Toggle));
    }

    #[test]
    fn click_outside_list_is_ignored() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        controller.handle_row_click(7, 2, Some(&mut delegate));

        assert_eq!(controller.selected(), Some(0));
        assert!(delegate.selected.is_empty());
    }

    // =========================================================================
    // Session reset
    // =========================================================================

    #[test]
    fn becoming_visible_clears_text_and_matches() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "abc");

        controller.did_become_visible(Some(&mut delegate));

        assert_eq!(controller.view().text, "");
        assert!(controller.matches().is_empty());
        assert_eq!(controller.selected(), None);
        assert!(controller.view().focused);
    }

    #[test]
    fn becoming_visible_keeps_persisted_matches() {
        let options = PaletteOptions::default().with_persist_matches(true);
        let mut controller = PresentationController::new(Rc::new(options), TestView::default());
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "abc");
        controller.select(2);

        controller.did_become_visible(Some(&mut delegate));

        assert_eq!(controller.view().text, "");
        assert_eq!(controller.matches(), &[0, 1, 2]);
        assert_eq!(controller.selected(), Some(2));
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let mut controller = controller();
        let mut delegate = Numbers::new(3);
        type_query(&mut controller, &mut delegate, "a");

        assert!(!controller.select(3));
        assert_eq!(controller.selected(), Some(0));
        assert_eq!(controller.selected_item(), Some(&0));
    }
}
