//! The assembled palette a macOS host embeds.

use std::cell::RefCell;
use std::ptr::{self, NonNull};
use std::rc::{Rc, Weak};

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2_app_kit::{NSEvent, NSEventMask, NSView, NSWindow};
use objc2_foundation::MainThreadMarker;

use super::event::{is_key_down, key_event_from_ns_event};
use super::view::NativeView;
use super::window::{NativeWindow, PaletteNSWindow};
use crate::delegate::QuickOpenDelegate;
use crate::options::PaletteOptions;
use crate::presenter::Handled;
use crate::window::{try_with, QuickOpenWindowController};

type Controller<T, D> = QuickOpenWindowController<T, D, NativeWindow, NativeView>;

/// A quick-open palette backed by a native floating window.
///
/// Owns the window controller and routes AppKit input into it: key events
/// aimed at the palette window arrive through a local event monitor, and
/// row clicks through the table bridge.
///
/// AppKit calls back into the controller while it is already borrowed
/// (selecting a row programmatically fires the table's selection
/// notification, for one). Those nested calls are dropped rather than
/// allowed to panic.
pub struct QuickOpenPalette<T: 'static, D: 'static> {
    controller: Rc<RefCell<Controller<T, D>>>,
    monitor: Option<Retained<AnyObject>>,
}

impl<T, D> QuickOpenPalette<T, D>
where
    T: 'static,
    D: QuickOpenDelegate<T, Row = Retained<NSView>> + 'static,
{
    /// Builds the window and view tree and starts listening for key events.
    /// The palette starts hidden.
    pub fn new(mtm: MainThreadMarker, options: PaletteOptions, delegate: Option<D>) -> Self {
        let ns_window = PaletteNSWindow::new(mtm, &options);
        let window_number = ns_window.windowNumber();
        let host: Retained<NSWindow> = Retained::into_super(ns_window.clone());

        let view = NativeView::new(mtm, host, &options);
        let window = NativeWindow::new(mtm, ns_window);
        let controller = Rc::new(RefCell::new(QuickOpenWindowController::new(
            options,
            Some(window),
            view,
            delegate,
        )));

        let weak = Rc::downgrade(&controller);
        controller
            .borrow()
            .presenter()
            .view()
            .bridge()
            .set_click_handler(move |row, click_count| {
                with_controller(&weak, |controller| {
                    controller.handle_row_click(row, click_count)
                });
            });

        let monitor = install_key_monitor(Rc::downgrade(&controller), window_number);

        Self {
            controller,
            monitor,
        }
    }

    /// Shows the palette and brings the application forward.
    pub fn show(&self) {
        self.with(|controller| controller.show());
    }

    /// Shows the palette without activating the application.
    pub fn show_without_activation(&self) {
        self.with(|controller| controller.show_without_activation());
    }

    /// Hides the palette.
    pub fn close(&self) {
        self.with(|controller| controller.close());
    }

    /// Shows the palette if hidden, hides it if shown.
    pub fn toggle(&self) {
        self.with(|controller| controller.toggle());
    }

    /// Whether the palette window is on screen.
    ///
    /// `None` when asked from inside one of the palette's own callbacks
    /// (a delegate method, for one), where the answer is in flux.
    pub fn is_visible(&self) -> Option<bool> {
        self.with(|controller| controller.is_visible())
    }

    /// The shared window controller, for hosts that need the presenter or
    /// delegate directly.
    pub fn controller(&self) -> &Rc<RefCell<Controller<T, D>>> {
        &self.controller
    }

    fn with<R>(&self, f: impl FnOnce(&mut Controller<T, D>) -> R) -> Option<R> {
        let result = try_with(&*self.controller, f);
        if result.is_none() {
            tracing::warn!("palette called re-entrantly from its own callback, ignoring");
        }
        result
    }
}

impl<T: 'static, D: 'static> Drop for QuickOpenPalette<T, D> {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            // SAFETY: monitor was returned by addLocalMonitorForEventsMatchingMask
            unsafe { NSEvent::removeMonitor(&monitor) };
        }
    }
}

/// Runs `f` against the controller unless it is gone or already borrowed.
fn with_controller<T, D, R>(
    weak: &Weak<RefCell<Controller<T, D>>>,
    f: impl FnOnce(&mut Controller<T, D>) -> R,
) -> Option<R> {
    let controller = weak.upgrade()?;
    try_with(&*controller, f)
}

/// Routes key events for the palette window into the controller.
///
/// Returning null from the monitor swallows the event; returning it lets
/// AppKit deliver it to the search field as usual.
fn install_key_monitor<T, D>(
    weak: Weak<RefCell<Controller<T, D>>>,
    window_number: isize,
) -> Option<Retained<AnyObject>>
where
    T: 'static,
    D: QuickOpenDelegate<T, Row = Retained<NSView>> + 'static,
{
    let block = RcBlock::new(move |event: NonNull<NSEvent>| -> *mut NSEvent {
        // SAFETY: AppKit passes a valid event for the duration of the handler
        let ns_event = unsafe { event.as_ref() };
        if unsafe { ns_event.windowNumber() } != window_number {
            return event.as_ptr();
        }

        let key = key_event_from_ns_event(ns_event);
        if is_key_down(ns_event) {
            let handled = with_controller(&weak, |controller| controller.handle_key_down(&key));
            if matches!(handled, Some(Handled::Yes)) {
                return ptr::null_mut();
            }
        } else {
            with_controller(&weak, |controller| controller.handle_key_up(&key));
        }
        event.as_ptr()
    });

    // SAFETY: the block is 'static and only touches main-thread state; the
    // monitor is removed when the palette drops
    let monitor = unsafe {
        NSEvent::addLocalMonitorForEventsMatchingMask_handler(
            NSEventMask::KeyDown | NSEventMask::KeyUp,
            &block,
        )
    };
    if monitor.is_none() {
        tracing::error!("failed to install key event monitor; palette will not receive keys");
    }
    monitor
}
