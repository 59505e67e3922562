//! The palette's AppKit view tree.
//!
//! ```text
//! NSWindow (PaletteNSWindow)
//! └── root NSView (layer-backed, rounded)
//!     └── NSVisualEffectView (backdrop)
//!         └── NSStackView (vertical, edge insets)
//!             ├── NSTextField (search field)
//!             └── NSScrollView
//!                 └── NSTableView (one column, rows from PaletteTableBridge)
//! ```

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2::sel;
use objc2_app_kit::{
    NSAutoresizingMaskOptions, NSBorderType, NSColor, NSEdgeInsets, NSFocusRingType, NSFont,
    NSScrollView, NSStackView, NSStackViewDistribution, NSTableColumn,
    NSTableColumnResizingOptions, NSTableView, NSTableViewColumnAutoresizingStyle,
    NSTableViewSelectionHighlightStyle, NSTextField, NSUserInterfaceLayoutOrientation, NSView,
    NSVisualEffectBlendingMode, NSVisualEffectMaterial, NSVisualEffectState,
    NSVisualEffectView, NSWindow,
};
use objc2_foundation::{MainThreadMarker, NSIndexSet, NSPoint, NSRect, NSSize, NSString};

use super::table::PaletteTableBridge;
use crate::layout::{self, Frame, Size};
use crate::options::{FontSpec, PaletteOptions};
use crate::view::PaletteView;

/// [`PaletteView`] backed by native AppKit views.
pub struct NativeView {
    window: Retained<NSWindow>,
    root: Retained<NSView>,
    effect: Retained<NSVisualEffectView>,
    stack: Retained<NSStackView>,
    search_field: Retained<NSTextField>,
    table: Retained<NSTableView>,
    bridge: Retained<PaletteTableBridge>,
}

impl NativeView {
    /// Builds the view tree and installs it as the window's content view.
    pub fn new(mtm: MainThreadMarker, window: Retained<NSWindow>, options: &PaletteOptions) -> Self {
        let frame = NSRect::new(
            NSPoint::new(0.0, 0.0),
            NSSize::new(options.width, options.height),
        );

        // The layer mask is one point wider than the backdrop's radius so
        // no backdrop pixels show past the rounded corner
        let root = NSView::new(mtm);
        root.setFrame(frame);
        root.setWantsLayer(true);
        if let Some(layer) = root.layer() {
            layer.setCornerRadius(options.radius + 1.0);
            layer.setMasksToBounds(true);
        }

        let effect = NSVisualEffectView::new(mtm);
        effect.setFrame(frame);
        effect.setAutoresizingMask(
            NSAutoresizingMaskOptions::ViewWidthSizable
                | NSAutoresizingMaskOptions::ViewHeightSizable,
        );
        effect.setState(NSVisualEffectState::Active);
        effect.setBlendingMode(NSVisualEffectBlendingMode::BehindWindow);
        effect.setMaterial(NSVisualEffectMaterial(options.material.raw_value()));
        effect.setWantsLayer(true);
        if let Some(layer) = effect.layer() {
            layer.setCornerRadius(options.radius);
        }
        root.addSubview(&effect);

        let search_field = make_search_field(mtm, options);
        let bridge = PaletteTableBridge::new(mtm, options.row_height);
        let table = make_table(mtm, options, &bridge);

        let scroll = NSScrollView::new(mtm);
        scroll.setBorderType(NSBorderType::NoBorder);
        scroll.setDrawsBackground(false);
        scroll.setHasVerticalScroller(true);
        scroll.setAutohidesScrollers(true);
        scroll.setDocumentView(Some(&table));

        let insets = options.edge_insets;
        let stack = NSStackView::new(mtm);
        stack.setOrientation(NSUserInterfaceLayoutOrientation::Vertical);
        stack.setDistribution(NSStackViewDistribution::Fill);
        stack.setEdgeInsets(NSEdgeInsets {
            top: insets.top,
            left: insets.left,
            bottom: insets.bottom,
            right: insets.right,
        });
        stack.setSpacing(0.0);
        stack.setTranslatesAutoresizingMaskIntoConstraints(false);
        stack.addArrangedSubview(&search_field);
        stack.addArrangedSubview(&scroll);
        effect.addSubview(&stack);

        let field_height = (options.height - insets.top - insets.bottom).max(0.0);
        // SAFETY: each pair of anchors belongs to views in the same hierarchy
        let constraints = unsafe {
            [
                stack.topAnchor().constraintEqualToAnchor(&effect.topAnchor()),
                stack.bottomAnchor().constraintEqualToAnchor(&effect.bottomAnchor()),
                stack.leadingAnchor().constraintEqualToAnchor(&effect.leadingAnchor()),
                stack.trailingAnchor().constraintEqualToAnchor(&effect.trailingAnchor()),
                search_field.heightAnchor().constraintEqualToConstant(field_height),
            ]
        };
        for constraint in &constraints {
            constraint.setActive(true);
        }

        window.setContentView(Some(&root));

        Self {
            window,
            root,
            effect,
            stack,
            search_field,
            table,
            bridge,
        }
    }

    /// The table's data source and click target.
    pub fn bridge(&self) -> &PaletteTableBridge {
        &self.bridge
    }
}

fn make_search_field(mtm: MainThreadMarker, options: &PaletteOptions) -> Retained<NSTextField> {
    let field = NSTextField::new(mtm);
    field.setEditable(true);
    field.setBezeled(false);
    field.setBordered(false);
    field.setDrawsBackground(false);
    field.setFocusRingType(NSFocusRingType::None);
    field.setPlaceholderString(Some(&NSString::from_str(&options.placeholder)));
    field.setFont(Some(&resolve_font(&options.font)));
    field
}

/// Falls back to the system font when the named family is not installed.
fn resolve_font(spec: &FontSpec) -> Retained<NSFont> {
    if let Some(family) = &spec.family {
        if let Some(font) = NSFont::fontWithName_size(&NSString::from_str(family), spec.size) {
            return font;
        }
        tracing::warn!(family = %family, "font not found, using system font");
    }
    NSFont::systemFontOfSize(spec.size)
}

fn make_table(
    mtm: MainThreadMarker,
    options: &PaletteOptions,
    bridge: &PaletteTableBridge,
) -> Retained<NSTableView> {
    let table = NSTableView::new(mtm);
    table.setHeaderView(None);
    table.setRowHeight(options.row_height);
    table.setIntercellSpacing(NSSize::new(0.0, 0.0));
    table.setBackgroundColor(&NSColor::clearColor());
    table.setFocusRingType(NSFocusRingType::None);
    table.setSelectionHighlightStyle(NSTableViewSelectionHighlightStyle::Regular);

    let column = NSTableColumn::initWithIdentifier(
        mtm.alloc::<NSTableColumn>(),
        &NSString::from_str("match"),
    );
    // The column tracks the clip view, which sits inside the side insets
    column.setWidth(layout::inner_width(options));
    column.setResizingMask(NSTableColumnResizingOptions::AutoresizingMask);
    table.addTableColumn(&column);
    table.setColumnAutoresizingStyle(
        NSTableViewColumnAutoresizingStyle::UniformColumnAutoresizingStyle,
    );

    // SAFETY: the bridge outlives the table; NativeView owns both
    unsafe {
        table.setDataSource(Some(ProtocolObject::from_ref(bridge)));
        table.setDelegate(Some(ProtocolObject::from_ref(bridge)));
        table.setTarget(Some(bridge));
        table.setDoubleAction(Some(sel!(rowDoubleClicked:)));
    }

    table
}

impl PaletteView for NativeView {
    type Row = Retained<NSView>;

    fn search_text(&self) -> String {
        self.search_field.stringValue().to_string()
    }

    fn set_search_text(&mut self, text: &str) {
        self.search_field.setStringValue(&NSString::from_str(text));
    }

    fn focus_search_field(&mut self) {
        self.window.makeFirstResponder(Some(&self.search_field));
    }

    fn reload_rows(&mut self, rows: Vec<Option<Self::Row>>) {
        self.bridge.set_rows(rows);
        self.table.reloadData();
    }

    fn select_row(&mut self, index: usize) {
        let rows = NSIndexSet::indexSetWithIndex(index);
        self.table.selectRowIndexes_byExtendingSelection(&rows, false);
    }

    fn scroll_row_to_visible(&mut self, index: usize) {
        self.table.scrollRowToVisible(index as isize);
    }

    fn set_content_size(&mut self, size: Size) {
        let size = NSSize::new(size.width, size.height);
        self.root.setFrameSize(size);
        self.effect.setFrameSize(size);
    }

    fn set_stack_spacing(&mut self, spacing: f64) {
        self.stack.setSpacing(spacing);
    }

    fn window_frame(&self) -> Option<Frame> {
        let frame = self.window.frame();
        Some(Frame::new(
            frame.origin.x,
            frame.origin.y,
            frame.size.width,
            frame.size.height,
        ))
    }

    fn set_window_frame(&mut self, frame: Frame) {
        let rect = NSRect::new(
            NSPoint::new(frame.x, frame.y),
            NSSize::new(frame.width, frame.height),
        );
        self.window.setFrame_display(rect, true);
    }
}
