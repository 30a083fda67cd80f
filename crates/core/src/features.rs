//! Pixel-derived math-likeness signals produced by the upstream feature
//! extractor.

use serde::{Deserialize, Serialize};

/// Vertical placement of the content inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Horizontal placement of the region on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Symbol indicators and layout statistics for one region.
///
/// Numeric metrics are non-negative; density, uniformity and the complexity
/// metrics are conventionally in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MathFeatures {
    pub has_greek_letters: bool,
    pub has_integral_symbols: bool,
    pub has_summation_symbols: bool,
    pub has_fraction_lines: bool,
    pub has_superscripts: bool,
    pub has_subscripts: bool,
    pub has_matrix_brackets: bool,
    pub has_root_symbols: bool,

    pub aspect_ratio: f64,
    pub density: f64,
    pub vertical_complexity: f64,
    pub horizontal_spacing: f64,
    pub edge_density: f64,
    pub stroke_width: f64,
    pub uniformity: f64,
    pub surrounding_text_density: f64,

    pub vertical_alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
}
