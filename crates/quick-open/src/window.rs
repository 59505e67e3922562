//!
//! The palette's window controller.
//!
//! [`QuickOpenWindowController`] owns the floating window, the presentation
//! controller and the host's delegate, and is the palette's whole control
//! surface: [`show`](QuickOpenWindowController::show),
//! [`show_without_activation`](QuickOpenWindowController::show_without_activation),
//! [`close`](QuickOpenWindowController::close) and
//! [`toggle`](QuickOpenWindowController::toggle).
//!
//! Visibility is never tracked separately; it is always read back from the
//! native window so the two cannot drift apart.
//!
//! # Became-visible signal
//!
//! [`show_without_activation`](QuickOpenWindowController::show_without_activation)
//! is the single point where the presentation controller learns the palette
//! is on screen. It runs after the window has been ordered front and before
//! any key event can reach the palette. That is where the search text is
//! cleared and, unless matches persist, the previous list is dropped.
//! Centering happens afterwards, against the window's post-reset size.

use std::cell::RefCell;
use std::rc::Rc;

use quick_open_input::KeyEvent;

use crate::delegate::QuickOpenDelegate;
use crate::options::PaletteOptions;
use crate::presenter::{Handled, PresentationController, WindowRequest};
use crate::view::PaletteView;

/// Name the window frame is saved under when `persist_position` is set.
pub const AUTOSAVE_NAME: &str = "QuickOpenWindow";

/// The native window hosting the palette.
pub trait PaletteWindow {
    /// Whether the window is currently on screen.
    fn is_visible(&self) -> bool;

    /// Orders the window in front of all others and makes it key.
    fn order_front(&mut self);

    /// Raises the window to the floating (always-on-top) level.
    fn set_floating_level(&mut self);

    /// Centers the window on its screen.
    fn center(&mut self);

    /// Brings the hosting application to the foreground.
    fn activate_app(&mut self);

    /// Removes the window from the screen.
    fn close(&mut self);

    /// Saves the window frame under `name` from now on.
    ///
    /// Returns true when a frame previously saved under `name` was restored.
    fn set_frame_autosave_name(&mut self, name: &str) -> bool;
}

/// Window controller for the palette.
///
/// Generic over the host's item type `T`, its delegate `D`, and the
/// platform's window `W` and view `V`.
pub struct QuickOpenWindowController<T, D, W, V> {
    options: Rc<PaletteOptions>,
    window: Option<W>,
    presenter: PresentationController<T, V>,
    delegate: Option<D>,
    /// Whether the palette has been shown at least once.
    has_been_shown: bool,
    /// Whether a saved frame was restored at construction.
    restored_frame: bool,
}

impl<T, D, W, V> QuickOpenWindowController<T, D, W, V>
where
    D: QuickOpenDelegate<T, Row = V::Row>,
    W: PaletteWindow,
    V: PaletteView,
{
    /// Creates the controller. The window starts hidden.
    ///
    /// With `persist_position` set, the window's frame is saved under
    /// [`AUTOSAVE_NAME`] and any previously saved frame is restored.
    pub fn new(options: PaletteOptions, mut window: Option<W>, view: V, delegate: Option<D>) -> Self {
        let options = Rc::new(options);

        let restored_frame = match window.as_mut() {
            Some(window) if options.persist_position => window.set_frame_autosave_name(AUTOSAVE_NAME),
            _ => false,
        };
        if restored_frame {
            tracing::debug!(name = AUTOSAVE_NAME, "restored palette window frame");
        }

        Self {
            presenter: PresentationController::new(Rc::clone(&options), view),
            options,
            window,
            delegate,
            has_been_shown: false,
            restored_frame,
        }
    }

    /// Whether the palette window is on screen.
    pub fn is_visible(&self) -> bool {
        self.window.as_ref().is_some_and(|window| window.is_visible())
    }

    /// Shows the palette and activates the hosting application.
    pub fn show(&mut self) {
        if self.is_visible() {
            return;
        }

        self.show_without_activation();

        if let Some(window) = self.window.as_mut() {
            window.activate_app();
        }
    }

    /// Shows the palette, leaving application activation to the caller.
    ///
    /// Does nothing when the palette is already visible or has no window.
    pub fn show_without_activation(&mut self) {
        if self.is_visible() {
            return;
        }
        let Some(window) = self.window.as_mut() else {
            return;
        };

        window.order_front();
        window.set_floating_level();

        // The reset may resize the window; center on its final size
        self.presenter.did_become_visible(self.delegate.as_mut());

        // A restored or previously placed frame wins only when positions persist
        let keep_position =
            self.options.persist_position && (self.restored_frame || self.has_been_shown);
        if !keep_position {
            if let Some(window) = self.window.as_mut() {
                window.center();
            }
        }
        self.has_been_shown = true;

        tracing::debug!(keep_position, "palette shown");
    }

    /// Closes the palette if it is visible.
    ///
    /// The delegate's `on_window_closed` runs immediately before the native
    /// close, exactly once per visible-to-hidden transition.
    pub fn close(&mut self) {
        if !self.is_visible() {
            return;
        }

        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_window_closed();
        }
        if let Some(window) = self.window.as_mut() {
            window.close();
        }
        tracing::debug!("palette closed");
    }

    /// Closes the palette if it is visible, shows it otherwise.
    pub fn toggle(&mut self) {
        if self.is_visible() {
            self.close();
        } else {
            self.show();
        }
    }

    // =========================================================================
    // Event entry points
    // =========================================================================

    /// Routes a key-down event to the palette.
    ///
    /// Returns [`Handled::No`] when the event should continue on to the
    /// search field.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> Handled {
        let visible = self.is_visible();
        let handled = self
            .presenter
            .handle_key_down(event, visible, self.delegate.as_mut());
        self.process_request();
        handled
    }

    /// Routes a key-up event to the palette.
    pub fn handle_key_up(&mut self, event: &KeyEvent) {
        let visible = self.is_visible();
        self.presenter
            .handle_key_up(event, visible, self.delegate.as_mut());
        self.process_request();
    }

    /// Routes a click on a list row to the palette.
    pub fn handle_row_click(&mut self, row: usize, click_count: u32) {
        self.presenter
            .handle_row_click(row, click_count, self.delegate.as_mut());
        self.process_request();
    }

    fn process_request(&mut self) {
        match self.presenter.take_request() {
            Some(WindowRequest::Toggle) => self.toggle(),
            None => {}
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn presenter(&self) -> &PresentationController<T, V> {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut PresentationController<T, V> {
        &mut self.presenter
    }
}

/// Runs `f` against a shared controller unless it is already borrowed.
///
/// Native callbacks can fire while the controller is mid-update. Those
/// nested calls get `None` and leave the controller untouched.
pub fn try_with<C, R>(shared: &RefCell<C>, f: impl FnOnce(&mut C) -> R) -> Option<R> {
    let mut controller = shared.try_borrow_mut().ok()?;
    Some(f(&mut controller))
}
