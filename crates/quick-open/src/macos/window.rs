//! The palette's native window.

use objc2::rc::Retained;
use objc2::{define_class, msg_send, MainThreadOnly};
use objc2_app_kit::{
    NSApplication, NSBackingStoreType, NSColor, NSWindow, NSWindowLevel, NSWindowStyleMask,
};
use objc2_foundation::{MainThreadMarker, NSPoint, NSRect, NSSize, NSString};

use crate::options::PaletteOptions;
use crate::window::PaletteWindow;

/// NSFloatingWindowLevel: above normal windows, below modal panels.
const NS_FLOATING_WINDOW_LEVEL: NSWindowLevel = 3;

define_class!(
    // SAFETY: PaletteNSWindow follows Objective-C memory management rules
    // and is only accessed from the main thread
    #[unsafe(super = NSWindow)]
    #[thread_kind = MainThreadOnly]
    #[name = "QuickOpenPaletteWindow"]
    pub struct PaletteNSWindow;

    impl PaletteNSWindow {
        /// Borderless windows refuse key status by default; the search
        /// field needs it to receive typing.
        #[unsafe(method(canBecomeKeyWindow))]
        fn __can_become_key_window(&self) -> bool {
            true
        }

        #[unsafe(method(canBecomeMainWindow))]
        fn __can_become_main_window(&self) -> bool {
            true
        }
    }
);

impl PaletteNSWindow {
    /// Creates a hidden, borderless, transparent window sized for an empty palette.
    pub fn new(mtm: MainThreadMarker, options: &PaletteOptions) -> Retained<Self> {
        let content_rect = NSRect::new(
            NSPoint::new(0.0, 0.0),
            NSSize::new(options.width, options.height),
        );

        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(());
        let window: Retained<Self> = unsafe {
            msg_send![
                super(this),
                initWithContentRect: content_rect,
                styleMask: NSWindowStyleMask::Borderless,
                backing: NSBackingStoreType::Buffered,
                defer: false
            ]
        };

        // We own the window through Retained; never let AppKit release it on close
        unsafe { window.setReleasedWhenClosed(false) };
        window.setOpaque(false);
        window.setHasShadow(true);
        window.setBackgroundColor(Some(&NSColor::clearColor()));
        window.setMovableByWindowBackground(true);

        window
    }
}

/// [`PaletteWindow`] backed by a [`PaletteNSWindow`].
pub struct NativeWindow {
    mtm: MainThreadMarker,
    window: Retained<PaletteNSWindow>,
}

impl NativeWindow {
    pub fn new(mtm: MainThreadMarker, window: Retained<PaletteNSWindow>) -> Self {
        Self { mtm, window }
    }
}

impl PaletteWindow for NativeWindow {
    fn is_visible(&self) -> bool {
        self.window.isVisible()
    }

    fn order_front(&mut self) {
        self.window.makeKeyAndOrderFront(None);
        self.window.orderFrontRegardless();
    }

    fn set_floating_level(&mut self) {
        self.window.setLevel(NS_FLOATING_WINDOW_LEVEL);
    }

    fn center(&mut self) {
        self.window.center();
    }

    fn activate_app(&mut self) {
        let app = NSApplication::sharedApplication(self.mtm);
        // activateIgnoringOtherApps is deprecated but still the only call that
        // reliably brings an accessory or unbundled app forward
        #[allow(deprecated)]
        app.activateIgnoringOtherApps(true);
    }

    fn close(&mut self) {
        self.window.orderOut(None);
    }

    fn set_frame_autosave_name(&mut self, name: &str) -> bool {
        let name = NSString::from_str(name);
        let restored = self.window.setFrameUsingName(&name);
        self.window.setFrameAutosaveName(&name);
        restored
    }
}
