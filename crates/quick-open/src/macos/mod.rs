//!
//! AppKit shell for the palette.
//!
//! Implements [`PaletteWindow`](crate::PaletteWindow) and
//! [`PaletteView`](crate::PaletteView) with native views and assembles them
//! into [`QuickOpenPalette`], the type a macOS host embeds.
//!
//! Everything in this module must run on the main thread.

mod event;
mod palette;
mod table;
mod view;
mod window;

pub use event::{is_key_down, key_event_from_ns_event};
pub use palette::QuickOpenPalette;
pub use table::PaletteTableBridge;
pub use view::NativeView;
pub use window::{NativeWindow, PaletteNSWindow};
