//! Confidence scoring parameters.
//!
//! Contains ConfidenceParams and its parts: evidence weights for the feature
//! dimension, formula-typical metric bands, context checks, the dimension
//! weights of the overall average and the level cutoffs.

use serde::{Deserialize, Serialize};

use crate::error::{MathzoneError, Result, ensure_in_range, ensure_non_negative};

use super::types::ConfidenceLevel;

/// Evidence mass contributed by each math-indicative feature.
///
/// Symbol indicators weigh more than the generic layout statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub integral: f64,
    pub summation: f64,
    pub fraction_line: f64,
    pub greek: f64,
    pub superscript: f64,
    pub subscript: f64,
    pub matrix_bracket: f64,
    pub root: f64,
    pub density: f64,
    pub vertical_complexity: f64,
    pub edge_density: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            integral: 0.15,
            summation: 0.12,
            fraction_line: 0.12,
            greek: 0.10,
            superscript: 0.08,
            subscript: 0.08,
            matrix_bracket: 0.08,
            root: 0.07,
            density: 0.07,
            vertical_complexity: 0.08,
            edge_density: 0.05,
        }
    }
}

impl FeatureWeights {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("confidence.feature_weights.integral", self.integral),
            ("confidence.feature_weights.summation", self.summation),
            ("confidence.feature_weights.fraction_line", self.fraction_line),
            ("confidence.feature_weights.greek", self.greek),
            ("confidence.feature_weights.superscript", self.superscript),
            ("confidence.feature_weights.subscript", self.subscript),
            ("confidence.feature_weights.matrix_bracket", self.matrix_bracket),
            ("confidence.feature_weights.root", self.root),
            ("confidence.feature_weights.density", self.density),
            (
                "confidence.feature_weights.vertical_complexity",
                self.vertical_complexity,
            ),
            ("confidence.feature_weights.edge_density", self.edge_density),
        ] {
            ensure_non_negative(field, value)?;
        }
        Ok(())
    }
}

/// Inclusive ranges in which a layout statistic looks formula-typical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureBands {
    pub density: (f64, f64),
    pub vertical_complexity: (f64, f64),
    pub edge_density: (f64, f64),
}

impl Default for FeatureBands {
    fn default() -> Self {
        Self {
            density: (0.1, 0.6),
            vertical_complexity: (0.3, 0.9),
            edge_density: (0.1, 0.5),
        }
    }
}

impl FeatureBands {
    fn validate(&self) -> Result<()> {
        for (field, (lo, hi)) in [
            ("confidence.feature_bands.density", self.density),
            (
                "confidence.feature_bands.vertical_complexity",
                self.vertical_complexity,
            ),
            ("confidence.feature_bands.edge_density", self.edge_density),
        ] {
            ensure_non_negative(field, lo)?;
            ensure_non_negative(field, hi)?;
            if lo > hi {
                return Err(MathzoneError::invalid(
                    field,
                    format!("band lower bound {lo} exceeds upper bound {hi}"),
                ));
            }
        }
        Ok(())
    }
}

/// Checks of the declared formula type against the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// Multiplicative penalty applied once per contradicting signal.
    pub contradiction_penalty: f64,
    /// Additive bonus per supporting signal.
    pub support_bonus: f64,
    /// Surrounding text density at or below this reads as isolated.
    pub sparse_text_density: f64,
    /// Surrounding text density at or above this reads as running text.
    pub dense_text_density: f64,
    /// Vertical complexity at or above this reads as a stacked block.
    pub tall_complexity: f64,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            contradiction_penalty: 0.3,
            support_bonus: 0.05,
            sparse_text_density: 0.15,
            dense_text_density: 0.4,
            tall_complexity: 0.7,
        }
    }
}

impl ContextParams {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("confidence.context.contradiction_penalty", self.contradiction_penalty),
            ("confidence.context.support_bonus", self.support_bonus),
        ] {
            ensure_in_range(field, value, 0.0, 1.0)?;
        }
        for (field, value) in [
            ("confidence.context.sparse_text_density", self.sparse_text_density),
            ("confidence.context.dense_text_density", self.dense_text_density),
            ("confidence.context.tall_complexity", self.tall_complexity),
        ] {
            ensure_non_negative(field, value)?;
        }
        if self.sparse_text_density > self.dense_text_density {
            return Err(MathzoneError::invalid(
                "confidence.context.sparse_text_density",
                "must not exceed dense_text_density",
            ));
        }
        Ok(())
    }
}

/// Weights of the four dimensions in the overall average. They sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub feature_match: f64,
    pub classification_certainty: f64,
    pub boundary_clarity: f64,
    pub context_consistency: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            feature_match: 0.35,
            classification_certainty: 0.35,
            boundary_clarity: 0.15,
            context_consistency: 0.15,
        }
    }
}

impl DimensionWeights {
    pub fn total(&self) -> f64 {
        self.feature_match
            + self.classification_certainty
            + self.boundary_clarity
            + self.context_consistency
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("confidence.dimensions.feature_match", self.feature_match),
            (
                "confidence.dimensions.classification_certainty",
                self.classification_certainty,
            ),
            ("confidence.dimensions.boundary_clarity", self.boundary_clarity),
            (
                "confidence.dimensions.context_consistency",
                self.context_consistency,
            ),
        ] {
            ensure_non_negative(field, value)?;
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(MathzoneError::invalid(
                "confidence.dimensions",
                format!("weights must sum to 1, got {total}"),
            ));
        }
        Ok(())
    }
}

/// Cutoffs bucketing the overall confidence into levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCutoffs {
    pub high: f64,
    pub medium: f64,
}

impl Default for LevelCutoffs {
    fn default() -> Self {
        Self {
            high: 0.9,
            medium: 0.6,
        }
    }
}

impl LevelCutoffs {
    /// Level of an overall confidence value.
    pub fn level(&self, overall: f64) -> ConfidenceLevel {
        if overall >= self.high {
            ConfidenceLevel::High
        } else if overall >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_in_range("confidence.levels.high", self.high, 0.0, 1.0)?;
        ensure_in_range("confidence.levels.medium", self.medium, 0.0, self.high)
    }
}

/// Parameters for confidence scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceParams {
    pub feature_weights: FeatureWeights,
    pub feature_bands: FeatureBands,

    /// Evidence mass at which the feature match saturates at 1. Strong
    /// formulas rarely show every indicator at once.
    pub feature_saturation: f64,

    /// Factor applied to the classification certainty when the upstream label
    /// is not `formula`.
    pub non_formula_penalty: f64,

    pub context: ContextParams,
    pub dimensions: DimensionWeights,
    pub levels: LevelCutoffs,

    /// Lowest level that is accepted without manual review.
    pub auto_accept_level: ConfidenceLevel,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            feature_weights: FeatureWeights::default(),
            feature_bands: FeatureBands::default(),
            feature_saturation: 0.5,
            non_formula_penalty: 0.5,
            context: ContextParams::default(),
            dimensions: DimensionWeights::default(),
            levels: LevelCutoffs::default(),
            auto_accept_level: ConfidenceLevel::High,
        }
    }
}

impl ConfidenceParams {
    /// Checks every weight, band and cutoff against its legal domain.
    pub fn validate(&self) -> Result<()> {
        self.feature_weights.validate()?;
        self.feature_bands.validate()?;
        ensure_non_negative("confidence.feature_saturation", self.feature_saturation)?;
        if self.feature_saturation == 0.0 {
            return Err(MathzoneError::invalid(
                "confidence.feature_saturation",
                "must be greater than 0",
            ));
        }
        ensure_in_range(
            "confidence.non_formula_penalty",
            self.non_formula_penalty,
            0.0,
            1.0,
        )?;
        self.context.validate()?;
        self.dimensions.validate()?;
        self.levels.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfidenceParams::default().validate().is_ok());
    }

    #[test]
    fn dimension_weights_must_sum_to_one() {
        let mut params = ConfidenceParams::default();
        params.dimensions.boundary_clarity = 0.5;
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1"), "{err}");
    }

    #[test]
    fn medium_cutoff_cannot_exceed_high() {
        let mut params = ConfidenceParams::default();
        params.levels.medium = 0.95;
        assert!(params.validate().is_err());
    }

    #[test]
    fn context_checks_cover_every_field() {
        let setters: [fn(&mut ContextParams); 4] = [
            |c| c.contradiction_penalty = 1.5,
            |c| c.support_bonus = -0.1,
            |c| c.tall_complexity = f64::NAN,
            |c| c.sparse_text_density = 0.5,
        ];
        for set in setters {
            let mut params = ConfidenceParams::default();
            set(&mut params.context);
            assert!(params.validate().is_err(), "{:?}", params.context);
        }

        let mut params = ConfidenceParams::default();
        params.dimensions.context_consistency = -0.15;
        params.dimensions.feature_match = 0.65;
        assert!(params.validate().is_err());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut params = ConfidenceParams::default();
        params.feature_bands.density = (0.8, 0.2);
        assert!(params.validate().is_err());
    }

    #[test]
    fn level_boundaries_are_inclusive_from_below() {
        let cutoffs = LevelCutoffs::default();
        assert_eq!(cutoffs.level(0.9), ConfidenceLevel::High);
        assert_eq!(cutoffs.level(0.8999), ConfidenceLevel::Medium);
        assert_eq!(cutoffs.level(0.6), ConfidenceLevel::Medium);
        assert_eq!(cutoffs.level(0.5999), ConfidenceLevel::Low);
        assert_eq!(cutoffs.level(0.0), ConfidenceLevel::Low);
    }
}
