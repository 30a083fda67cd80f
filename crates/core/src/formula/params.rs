//! Formula type classification parameters.
//!
//! Contains FormulaTypeParams for controlling the display/inline decision.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_in_range, ensure_non_negative};

use super::reason::Reason;
use super::types::FormulaType;

/// Vote weight carried by each layout rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    pub vertical_isolation: f64,
    pub horizontal_centering: f64,
    pub large_size: f64,
    pub no_text_on_same_line: f64,
    pub aligned_with_text: f64,
    pub shares_baseline: f64,
    pub small_height: f64,
    pub surrounded_by_text: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            vertical_isolation: 3.0,
            horizontal_centering: 1.5,
            large_size: 2.0,
            no_text_on_same_line: 1.5,
            aligned_with_text: 2.0,
            shares_baseline: 3.0,
            small_height: 1.0,
            surrounded_by_text: 2.0,
        }
    }
}

impl RuleWeights {
    /// Weight of a rule; bookkeeping reasons carry none.
    pub fn weight(&self, reason: Reason) -> f64 {
        match reason {
            Reason::VerticalIsolation => self.vertical_isolation,
            Reason::HorizontalCentering => self.horizontal_centering,
            Reason::LargeSize => self.large_size,
            Reason::NoTextOnSameLine => self.no_text_on_same_line,
            Reason::AlignedWithText => self.aligned_with_text,
            Reason::SharesBaseline => self.shares_baseline,
            Reason::SmallHeight => self.small_height,
            Reason::SurroundedByText => self.surrounded_by_text,
            Reason::InsufficientEvidence | Reason::TieBreak => 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("formula.weights.vertical_isolation", self.vertical_isolation),
            ("formula.weights.horizontal_centering", self.horizontal_centering),
            ("formula.weights.large_size", self.large_size),
            ("formula.weights.no_text_on_same_line", self.no_text_on_same_line),
            ("formula.weights.aligned_with_text", self.aligned_with_text),
            ("formula.weights.shares_baseline", self.shares_baseline),
            ("formula.weights.small_height", self.small_height),
            ("formula.weights.surrounded_by_text", self.surrounded_by_text),
        ] {
            ensure_non_negative(field, value)?;
        }
        Ok(())
    }
}

/// Parameters for formula type classification.
///
/// Distances are in page pixels unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaTypeParams {
    /// Minimum whitespace between the region and the nearest text line above
    /// and below for the region to count as vertically isolated.
    pub gap_threshold: f64,

    /// Maximum distance between the region's horizontal center and the page's,
    /// specified relative to the page width.
    pub center_tolerance: f64,

    /// Regions at least this tall read as block formulas.
    pub large_height_threshold: f64,

    /// Regions at most this tall read as inline formulas.
    pub small_height_threshold: f64,

    /// If a text line overlaps the region by more than this they are considered
    /// to be on the same line. Specified relative to the shorter of the two.
    pub min_overlap_ratio: f64,

    /// Maximum difference between the tops of a region and a text line that
    /// still counts as a shared baseline.
    pub baseline_epsilon: f64,

    /// Heights are comparable when the shorter is at least this fraction of the
    /// taller. 0 disables the height check of the baseline rule.
    pub baseline_height_ratio: f64,

    /// Text lines closer than this above and below the region bracket it.
    pub crowded_distance: f64,

    /// Confidence reported when no rule fires or the margin is zero.
    pub base_confidence: f64,

    /// Confidence gained per unit of normalized vote margin.
    pub margin_gain: f64,

    /// Confidence gained per rule fired on the winning side.
    pub per_rule_gain: f64,

    /// Side chosen when both sides collect the same weight.
    pub tie_break: FormulaType,

    pub weights: RuleWeights,
}

impl Default for FormulaTypeParams {
    fn default() -> Self {
        Self {
            gap_threshold: 30.0,
            center_tolerance: 0.05,
            large_height_threshold: 60.0,
            small_height_threshold: 30.0,
            min_overlap_ratio: 0.3,
            baseline_epsilon: 2.0,
            baseline_height_ratio: 0.5,
            crowded_distance: 15.0,
            base_confidence: 0.5,
            margin_gain: 0.35,
            per_rule_gain: 0.05,
            tie_break: FormulaType::Inline,
            weights: RuleWeights::default(),
        }
    }
}

impl FormulaTypeParams {
    /// Checks every threshold against its legal domain.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("formula.gap_threshold", self.gap_threshold),
            ("formula.large_height_threshold", self.large_height_threshold),
            ("formula.small_height_threshold", self.small_height_threshold),
            ("formula.baseline_epsilon", self.baseline_epsilon),
            ("formula.crowded_distance", self.crowded_distance),
            ("formula.margin_gain", self.margin_gain),
            ("formula.per_rule_gain", self.per_rule_gain),
        ] {
            ensure_non_negative(field, value)?;
        }
        for (field, value, max) in [
            ("formula.center_tolerance", self.center_tolerance, 0.5),
            ("formula.min_overlap_ratio", self.min_overlap_ratio, 1.0),
            ("formula.baseline_height_ratio", self.baseline_height_ratio, 1.0),
            ("formula.base_confidence", self.base_confidence, 1.0),
        ] {
            ensure_in_range(field, value, 0.0, max)?;
        }
        self.weights.validate()
    }
}
