//! Data source, delegate and double-click target for the match list.
//!
//! The bridge owns the row views the presentation controller built for the
//! current matches, so AppKit can ask for rows at any time without reaching
//! back into the controller. User clicks are reported through a handler
//! closure installed by [`QuickOpenPalette`](super::QuickOpenPalette).

use std::cell::{Cell, RefCell};

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{define_class, msg_send, DefinedClass, MainThreadOnly};
use objc2_app_kit::{
    NSControlTextEditingDelegate, NSTableColumn, NSTableView, NSTableViewDataSource,
    NSTableViewDelegate, NSView,
};
use objc2_foundation::{
    MainThreadMarker, NSInteger, NSNotification, NSObject, NSObjectProtocol,
};

// CGFloat is a type alias for f64 on 64-bit systems
type CGFloat = f64;

/// Called with `(row, click_count)` when the user clicks a row.
type ClickHandler = Box<dyn Fn(usize, u32)>;

/// Internal state for PaletteTableBridge
pub struct TableBridgeIvars {
    /// Row views for the current matches; `None` rows render empty
    rows: RefCell<Vec<Option<Retained<NSView>>>>,
    /// Fixed height of every row
    row_height: Cell<CGFloat>,
    /// Receives user clicks
    on_click: RefCell<Option<ClickHandler>>,
}

define_class!(
    // SAFETY: PaletteTableBridge follows Objective-C memory management rules
    // and is only accessed from the main thread
    #[unsafe(super = NSObject)]
    #[thread_kind = MainThreadOnly]
    #[ivars = TableBridgeIvars]
    #[name = "QuickOpenPaletteTableBridge"]
    pub struct PaletteTableBridge;

    // SAFETY: NSObjectProtocol is correctly implemented - we inherit from NSObject
    unsafe impl NSObjectProtocol for PaletteTableBridge {}

    // SAFETY: No text-editing callbacks are implemented; all are optional
    unsafe impl NSControlTextEditingDelegate for PaletteTableBridge {}

    // SAFETY: Method signatures match the NSTableViewDataSource protocol
    unsafe impl NSTableViewDataSource for PaletteTableBridge {
        #[unsafe(method(numberOfRowsInTableView:))]
        fn __number_of_rows(&self, _table_view: &NSTableView) -> NSInteger {
            self.ivars().rows.borrow().len() as NSInteger
        }
    }

    // SAFETY: Method signatures match the NSTableViewDelegate protocol
    unsafe impl NSTableViewDelegate for PaletteTableBridge {
        #[unsafe(method_id(tableView:viewForTableColumn:row:))]
        fn __view_for_row(
            &self,
            _table_view: &NSTableView,
            _column: Option<&NSTableColumn>,
            row: NSInteger,
        ) -> Option<Retained<NSView>> {
            let rows = self.ivars().rows.borrow();
            usize::try_from(row)
                .ok()
                .and_then(|row| rows.get(row))
                .and_then(|view| view.clone())
        }

        #[unsafe(method(tableView:heightOfRow:))]
        fn __height_of_row(&self, _table_view: &NSTableView, _row: NSInteger) -> CGFloat {
            self.ivars().row_height.get()
        }

        #[unsafe(method(tableView:shouldSelectRow:))]
        fn __should_select_row(&self, _table_view: &NSTableView, _row: NSInteger) -> bool {
            true
        }

        #[unsafe(method(tableViewSelectionDidChange:))]
        fn __selection_did_change(&self, notification: &NSNotification) {
            let Some(table) = notification.object() else {
                return;
            };
            let row: NSInteger = unsafe { msg_send![&*table, selectedRow] };
            self.report_click(row, 1);
        }
    }

    impl PaletteTableBridge {
        /// Double-click action sent by the table view.
        #[unsafe(method(rowDoubleClicked:))]
        fn __row_double_clicked(&self, sender: Option<&AnyObject>) {
            let Some(sender) = sender else {
                return;
            };
            let row: NSInteger = unsafe { msg_send![sender, clickedRow] };
            self.report_click(row, 2);
        }
    }
);

impl PaletteTableBridge {
    /// Creates a bridge with no rows.
    pub fn new(mtm: MainThreadMarker, row_height: CGFloat) -> Retained<Self> {
        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(TableBridgeIvars {
            rows: RefCell::new(Vec::new()),
            row_height: Cell::new(row_height),
            on_click: RefCell::new(None),
        });
        unsafe { msg_send![super(this), init] }
    }

    /// Replaces the row views. The caller reloads the table afterwards.
    pub fn set_rows(&self, rows: Vec<Option<Retained<NSView>>>) {
        *self.ivars().rows.borrow_mut() = rows;
    }

    /// Installs the handler that receives user clicks.
    pub fn set_click_handler<F>(&self, handler: F)
    where
        F: Fn(usize, u32) + 'static,
    {
        *self.ivars().on_click.borrow_mut() = Some(Box::new(handler));
    }

    fn report_click(&self, row: NSInteger, click_count: u32) {
        // -1 means the click landed outside any row
        let Ok(row) = usize::try_from(row) else {
            return;
        };
        if let Some(handler) = self.ivars().on_click.borrow().as_ref() {
            handler(row, click_count);
        }
    }
}
