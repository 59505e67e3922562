//!
//! Palette geometry.
//!
//! Pure functions that size the palette window for a given number of matches.
//! Coordinates follow AppKit: the origin is the bottom-left corner and y grows
//! upward, so keeping the top edge fixed means moving the origin down as the
//! window grows.

use crate::options::PaletteOptions;

/// Spacing between the search field and the match list when matches exist.
pub const RESULT_SPACING: f64 = 5.0;

/// A width and height in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A window frame in screen coordinates (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The y coordinate of the top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Number of rows the list shows before it scrolls.
pub fn visible_rows(match_count: usize, matches_shown: usize) -> usize {
    match_count.min(matches_shown)
}

/// Size of the palette content for the given number of matches.
pub fn palette_size(options: &PaletteOptions, match_count: usize) -> Size {
    let rows = visible_rows(match_count, options.matches_shown);
    let height = options.height + rows as f64 * options.row_height;
    Size::new(options.width, height)
}

/// Width left for the search field and list rows inside the edge insets.
pub fn inner_width(options: &PaletteOptions) -> f64 {
    let insets = options.edge_insets;
    (options.width - insets.left - insets.right).max(0.0)
}

/// Spacing between the search field and the list.
///
/// Zero when there are no matches, so the empty list leaves no visible seam.
pub fn stack_spacing(match_count: usize) -> f64 {
    if match_count > 0 {
        RESULT_SPACING
    } else {
        0.0
    }
}

/// Resizes `frame` to `size` while holding its top edge in place.
pub fn anchor_top(frame: Frame, size: Size) -> Frame {
    Frame::new(frame.x, frame.top() - size.height, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EdgeInsets;

    fn options() -> PaletteOptions {
        PaletteOptions::default()
            .with_width(500.0)
            .with_height(48.0)
            .with_row_height(40.0)
            .with_matches_shown(5)
    }

    #[test]
    fn visible_rows_caps_at_matches_shown() {
        assert_eq!(visible_rows(0, 5), 0);
        assert_eq!(visible_rows(3, 5), 3);
        assert_eq!(visible_rows(5, 5), 5);
        assert_eq!(visible_rows(50, 5), 5);
        assert_eq!(visible_rows(50, 0), 0);
    }

    #[test]
    fn empty_palette_is_base_height() {
        assert_eq!(palette_size(&options(), 0), Size::new(500.0, 48.0));
    }

    #[test]
    fn palette_grows_by_row_height() {
        assert_eq!(palette_size(&options(), 2), Size::new(500.0, 128.0));
    }

    #[test]
    fn palette_stops_growing_past_matches_shown() {
        assert_eq!(palette_size(&options(), 5), palette_size(&options(), 500));
        assert_eq!(palette_size(&options(), 500).height, 248.0);
    }

    #[test]
    fn inner_width_subtracts_side_insets() {
        let options = options().with_edge_insets(EdgeInsets::new(10.0, 12.0, 10.0, 8.0));
        assert_eq!(inner_width(&options), 480.0);
        assert_eq!(inner_width(&PaletteOptions::default()), 480.0);
    }

    #[test]
    fn inner_width_never_negative() {
        let options = options()
            .with_width(10.0)
            .with_edge_insets(EdgeInsets::uniform(10.0));
        assert_eq!(inner_width(&options), 0.0);
    }

    #[test]
    fn spacing_only_with_matches() {
        assert_eq!(stack_spacing(0), 0.0);
        assert_eq!(stack_spacing(1), RESULT_SPACING);
        assert_eq!(stack_spacing(40), RESULT_SPACING);
    }

    #[test]
    fn anchor_top_grows_downward() {
        let frame = Frame::new(100.0, 600.0, 500.0, 48.0);
        let grown = anchor_top(frame, Size::new(500.0, 248.0));

        assert_eq!(grown.top(), frame.top());
        assert_eq!(grown.y, 400.0);
        assert_eq!(grown.x, 100.0);
        assert_eq!(grown.size(), Size::new(500.0, 248.0));
    }

    #[test]
    fn anchor_top_shrinks_upward() {
        let frame = Frame::new(0.0, 400.0, 500.0, 248.0);
        let shrunk = anchor_top(frame, Size::new(500.0, 48.0));

        assert_eq!(shrunk.top(), 648.0);
        assert_eq!(shrunk.y, 600.0);
    }
}
