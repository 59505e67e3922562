//! Error type for the palette's configuration surface.
//!
//! Runtime operations (show, close, key handling) never fail; they skip work
//! when a window, delegate or selection is missing. Only loading and saving
//! [`PaletteOptions`](crate::PaletteOptions) can produce a [`PaletteError`].

use std::io;

/// Error type for loading, saving and validating palette options.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    /// The options file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The options file is not valid JSON for [`PaletteOptions`](crate::PaletteOptions)
    #[error("Malformed options file: {0}")]
    Json(#[from] serde_json::Error),

    /// An option holds a value the palette cannot lay out
    #[error("Invalid option `{field}`: {reason}")]
    InvalidOption {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },
}
