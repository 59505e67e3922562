//!
//! Palette configuration.
//!
//! [`PaletteOptions`] is created once by the host and lives for the palette's
//! whole life. The window controller owns it; the presentation controller only
//! reads it.
//!
//! ## File Location
//!
//! Options can be loaded from a JSON file stored at:
//! - macOS: `~/Library/Application Support/quick-open/palette.json`
//!
//! Any field missing from the file takes its default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// Application name used for the config directory.
const APP_NAME: &str = "quick-open";

/// Options file name.
const OPTIONS_FILENAME: &str = "palette.json";

// =============================================================================
// Option Types
// =============================================================================

/// Padding between the blur backdrop and the stacked search field and list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    pub fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    fn is_valid(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for EdgeInsets {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Font used by the search field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// PostScript or family name; `None` uses the system font
    pub family: Option<String>,
    /// Point size
    pub size: f64,
}

impl FontSpec {
    /// The system font at the given point size.
    pub fn system(size: f64) -> Self {
        Self { family: None, size }
    }

    /// A named font at the given point size.
    pub fn named(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: Some(family.into()),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::system(20.0)
    }
}

/// Blur material for the palette backdrop.
///
/// Maps 1:1 onto `NSVisualEffectMaterial` on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Titlebar,
    Selection,
    Menu,
    #[default]
    Popover,
    Sidebar,
    HeaderView,
    Sheet,
    WindowBackground,
    HudWindow,
    FullScreenUi,
    ToolTip,
    ContentBackground,
    UnderWindowBackground,
    UnderPageBackground,
}

impl Material {
    /// The `NSVisualEffectMaterial` raw value for this material.
    pub fn raw_value(self) -> isize {
        match self {
            Material::Titlebar => 3,
            Material::Selection => 4,
            Material::Menu => 5,
            Material::Popover => 6,
            Material::Sidebar => 7,
            Material::HeaderView => 10,
            Material::Sheet => 11,
            Material::WindowBackground => 12,
            Material::HudWindow => 13,
            Material::FullScreenUi => 15,
            Material::ToolTip => 17,
            Material::ContentBackground => 18,
            Material::UnderWindowBackground => 21,
            Material::UnderPageBackground => 22,
        }
    }
}

// =============================================================================
// PaletteOptions
// =============================================================================

/// Presentation and behavior options for the palette.
///
/// Geometry is in points. The window's height is `height` plus one
/// `row_height` per visible match, up to `matches_shown` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOptions {
    /// Window width
    pub width: f64,
    /// Base height with no matches shown (search field plus insets)
    pub height: f64,
    /// Height of a single match row
    pub row_height: f64,
    /// Number of rows shown before the list scrolls
    pub matches_shown: usize,
    /// Corner radius of the blur backdrop
    pub radius: f64,
    /// Insets around the stacked search field and list
    pub edge_insets: EdgeInsets,
    /// Search field font
    pub font: FontSpec,
    /// Placeholder shown in the empty search field
    pub placeholder: String,
    /// Blur material of the backdrop
    pub material: Material,
    /// Keep the previous matches when the palette is reopened
    pub persist_matches: bool,
    /// Remember the window position between sessions
    pub persist_position: bool,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 48.0,
            row_height: 42.0,
            matches_shown: 6,
            radius: 7.0,
            edge_insets: EdgeInsets::default(),
            font: FontSpec::default(),
            placeholder: "Search".to_string(),
            material: Material::default(),
            persist_matches: false,
            persist_position: false,
        }
    }
}

impl PaletteOptions {
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_matches_shown(mut self, matches_shown: usize) -> Self {
        self.matches_shown = matches_shown;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_edge_insets(mut self, edge_insets: EdgeInsets) -> Self {
        self.edge_insets = edge_insets;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_persist_matches(mut self, persist: bool) -> Self {
        self.persist_matches = persist;
        self
    }

    pub fn with_persist_position(mut self, persist: bool) -> Self {
        self.persist_position = persist;
        self
    }

    /// Checks that the geometry can be laid out.
    ///
    /// `matches_shown` may be zero, in which case the list never grows.
    pub fn validate(&self) -> Result<(), PaletteError> {
        fn positive(v: f64) -> bool {
            v.is_finite() && v > 0.0
        }
        fn non_negative(v: f64) -> bool {
            v.is_finite() && v >= 0.0
        }

        let checks: [(bool, &'static str, &'static str); 6] = [
            (positive(self.width), "width", "must be finite and greater than zero"),
            (non_negative(self.height), "height", "must be finite and not negative"),
            (positive(self.row_height), "row_height", "must be finite and greater than zero"),
            (non_negative(self.radius), "radius", "must be finite and not negative"),
            (self.edge_insets.is_valid(), "edge_insets", "every inset must be finite and not negative"),
            (positive(self.font.size), "font", "size must be finite and greater than zero"),
        ];

        match checks.iter().find(|(ok, _, _)| !ok) {
            Some(&(_, field, reason)) => Err(PaletteError::InvalidOption { field, reason }),
            None => Ok(()),
        }
    }

    /// Loads and validates options from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, PaletteError> {
        let contents = fs::read_to_string(path)?;
        let options: PaletteOptions = serde_json::from_str(&contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from [`config_file_path`], falling back to defaults.
    ///
    /// A missing file is not an error. A file that cannot be read, parsed or
    /// validated is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(options) => {
                tracing::debug!(path = %path.display(), "loaded palette options");
                options
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring palette options");
                Self::default()
            }
        }
    }

    /// Writes the options as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), PaletteError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Returns the path of the options file.
///
/// Returns `None` if the platform config directory cannot be determined.
pub fn config_file_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join(APP_NAME).join(OPTIONS_FILENAME))
}
