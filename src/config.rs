// src/config.rs

//! Defines the configuration structures for the glyph field renderer.
//!
//! The structs deserialize from a JSON file and every section falls back to
//! its `Default` impl, so a config file only needs the values it changes.
//! Command-line overrides are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// --- Defaults ---
const DEFAULT_STROKE_WIDTH: u32 = 4;
const DEFAULT_RESOLUTION: u32 = 64;
const DEFAULT_DEGREE: u32 = 3;
const DEFAULT_MAX_REFINE: u32 = 4;
const DEFAULT_OUTPUT: &str = "glyph-field.png";

/// Deepest accepted bisection of a cut cell. Quadrature points per cut cell
/// grow as `4^depth`.
pub const MAX_REFINE_LIMIT: u32 = 10;

// --- Top-Level Configuration Structure ---

/// The complete configuration for one render.
///
/// All values are explicit input to [`crate::pipeline::render`]; nothing is
/// read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Glyph geometry settings.
    pub glyph: GlyphConfig,
    /// Discretisation of the field problem.
    pub field: FieldConfig,
    /// Where the encoded raster goes.
    pub output: OutputConfig,
}

/// Glyph geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlyphConfig {
    /// Stroke width of the glyph in grid cells.
    pub stroke_width: u32,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        GlyphConfig {
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Discretisation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of cells per side of the regular domain; also the image size.
    pub resolution: u32,
    /// Polynomial degree of the spline basis.
    pub degree: u32,
    /// How many times a cell cut by the glyph boundary is bisected before
    /// quadrature points are classified one by one.
    pub max_refine: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            resolution: DEFAULT_RESOLUTION,
            degree: DEFAULT_DEGREE,
            max_refine: DEFAULT_MAX_REFINE,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the encoded raster.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Checks the hard constraints. Geometric parity is only advisory and is
    /// reported by [`Config::parity_advisory`] instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.glyph.stroke_width == 0 {
            return Err(ConfigError::ZeroStrokeWidth);
        }
        let n = self.field.resolution;
        if n == 0 || n % 2 != 0 {
            return Err(ConfigError::BadResolution(n));
        }
        if self.field.degree == 0 {
            return Err(ConfigError::ZeroDegree);
        }
        if self.field.max_refine > MAX_REFINE_LIMIT {
            return Err(ConfigError::RefineTooDeep(self.field.max_refine));
        }
        Ok(())
    }

    /// Returns a message when stroke width and resolution have different
    /// parity. The glyph edges then fall mid-cell instead of on cell
    /// boundaries; the render still proceeds.
    pub fn parity_advisory(&self) -> Option<String> {
        let w = self.glyph.stroke_width;
        let n = self.field.resolution;
        if w % 2 != n % 2 {
            Some(format!(
                "stroke width {} and resolution {} differ in parity; glyph edges will not align with cell boundaries",
                w, n
            ))
        } else {
            None
        }
    }
}
