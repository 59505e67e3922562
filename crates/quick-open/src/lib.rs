//! quick-open: a floating "go to file" style search palette.
//!
//! The palette accepts typed input, asks a host-supplied
//! [`QuickOpenDelegate`] for matching items, shows them in a scrollable list
//! and lets the user pick one with the keyboard or a double click.
//!
//! # Overview
//!
//! - [`QuickOpenWindowController`] owns the floating window and exposes the
//!   control surface: `show`, `show_without_activation`, `close`, `toggle`.
//! - [`PresentationController`] owns the candidate list and selection and
//!   routes key events through the [`dispatch`] transition function.
//! - [`PaletteWindow`] and [`PaletteView`] are the platform seams. The
//!   `macos` module implements them with AppKit; everything else is
//!   platform-free and unit tested without a window server.
//!
//! # Example
//!
//! ```ignore
//! use quick_open::{PaletteOptions, QuickOpenDelegate};
//!
//! struct Files(Vec<String>);
//!
//! impl QuickOpenDelegate<String> for Files {
//!     type Row = Retained<NSView>;
//!
//!     fn matches_for_query(&mut self, query: &str) -> Vec<String> {
//!         self.0.iter().filter(|f| f.contains(query)).cloned().collect()
//!     }
//!
//!     fn view_for_item(&mut self, item: &String) -> Option<Self::Row> {
//!         Some(label(item))
//!     }
//!
//!     fn on_item_selected(&mut self, item: &String) {
//!         open(item);
//!     }
//! }
//!
//! let palette = quick_open::macos::QuickOpenPalette::new(mtm, PaletteOptions::default(), Some(Files(files)));
//! palette.toggle();
//! ```

pub mod delegate;
pub mod dispatch;
pub mod error;
pub mod layout;
pub mod options;
pub mod presenter;
pub mod view;
pub mod window;

#[cfg(target_os = "macos")]
pub mod macos;

pub use quick_open_input as input;

pub use delegate::QuickOpenDelegate;
pub use error::PaletteError;
pub use layout::{Frame, Size};
pub use options::{config_file_path, EdgeInsets, FontSpec, Material, PaletteOptions};
pub use presenter::{Handled, PresentationController, WindowRequest};
pub use view::PaletteView;
pub use window::{try_with, PaletteWindow, QuickOpenWindowController, AUTOSAVE_NAME};
