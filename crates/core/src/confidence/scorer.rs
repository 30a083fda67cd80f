//! Aggregation of four evidence dimensions into one confidence value.

use tracing::debug;

use crate::classification::{ClassificationResult, ContentType};
use crate::features::{HorizontalAlignment, MathFeatures};
use crate::formula::{FormulaType, FormulaTypeResult, Reason};
use crate::utils::{clamp_unit, in_band, safe_ratio};

use super::params::ConfidenceParams;
use super::types::{
    ConfidenceBreakdown, ConfidenceScore, DetectionCandidate, ReviewDecision,
};

/// Scores how far the upstream detection of a region can be trusted.
///
/// Every output value is clamped into `[0, 1]` and never NaN, whatever the
/// inputs look like.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    params: ConfidenceParams,
}

impl ConfidenceScorer {
    pub fn new(params: ConfidenceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ConfidenceParams {
        &self.params
    }

    pub fn score(
        &self,
        detection: &DetectionCandidate,
        features: &MathFeatures,
        classification: &ClassificationResult,
    ) -> ConfidenceScore {
        let breakdown = ConfidenceBreakdown {
            feature_match: self.feature_match(features),
            classification_certainty: self.classification_certainty(classification),
            boundary_clarity: boundary_clarity(detection.boundary.tightness),
            context_consistency: self.context_consistency(&detection.formula_type, features),
        };
        let overall = self.overall(&breakdown);
        let level = self.params.levels.level(overall);
        debug!(
            overall,
            %level,
            feature_match = breakdown.feature_match,
            classification_certainty = breakdown.classification_certainty,
            boundary_clarity = breakdown.boundary_clarity,
            context_consistency = breakdown.context_consistency,
            "scored detection"
        );
        ConfidenceScore {
            overall,
            level,
            breakdown,
        }
    }

    /// Review decision for a score under the configured auto-accept level.
    pub fn review(&self, score: &ConfidenceScore) -> ReviewDecision {
        score.review(self.params.auto_accept_level)
    }

    /// Fixed-weight average of the breakdown.
    pub fn overall(&self, breakdown: &ConfidenceBreakdown) -> f64 {
        let w = &self.params.dimensions;
        let weighted = w.feature_match * breakdown.feature_match
            + w.classification_certainty * breakdown.classification_certainty
            + w.boundary_clarity * breakdown.boundary_clarity
            + w.context_consistency * breakdown.context_consistency;
        clamp_unit(safe_ratio(weighted, w.total()))
    }

    /// Weighted share of math-indicative signals, saturating at 1.
    ///
    /// Layout statistics only count inside their formula-typical band.
    pub fn feature_match(&self, features: &MathFeatures) -> f64 {
        let w = &self.params.feature_weights;
        let bands = &self.params.feature_bands;

        let mut evidence = 0.0;
        for (present, weight) in [
            (features.has_integral_symbols, w.integral),
            (features.has_summation_symbols, w.summation),
            (features.has_fraction_lines, w.fraction_line),
            (features.has_greek_letters, w.greek),
            (features.has_superscripts, w.superscript),
            (features.has_subscripts, w.subscript),
            (features.has_matrix_brackets, w.matrix_bracket),
            (features.has_root_symbols, w.root),
            (in_band(features.density, bands.density), w.density),
            (
                in_band(features.vertical_complexity, bands.vertical_complexity),
                w.vertical_complexity,
            ),
            (
                in_band(features.edge_density, bands.edge_density),
                w.edge_density,
            ),
        ] {
            if present {
                evidence += weight;
            }
        }

        clamp_unit(safe_ratio(evidence, self.params.feature_saturation))
    }

    /// Upstream confidence for a formula label. Any other label keeps only
    /// the residual formula score, penalized.
    pub fn classification_certainty(&self, classification: &ClassificationResult) -> f64 {
        let confidence = clamp_unit(classification.confidence);
        if classification.is_formula() {
            return confidence;
        }
        let residual = classification
            .scores
            .get(&ContentType::Formula)
            .copied()
            .map(clamp_unit)
            .unwrap_or(confidence);
        clamp_unit(residual * self.params.non_formula_penalty)
    }

    /// Agreement between the declared layout class and the feature vector.
    pub fn context_consistency(
        &self,
        formula_type: &FormulaTypeResult,
        features: &MathFeatures,
    ) -> f64 {
        let ctx = &self.params.context;
        let density = features.surrounding_text_density;

        let (mut contradictions, supports) = match formula_type.formula_type {
            FormulaType::Display => {
                let contradictions = [density >= ctx.dense_text_density];
                let supports = [
                    features.horizontal_alignment == HorizontalAlignment::Center,
                    density <= ctx.sparse_text_density,
                ];
                (count(&contradictions), count(&supports))
            }
            FormulaType::Inline => {
                let contradictions = [
                    features.has_matrix_brackets,
                    features.vertical_complexity >= ctx.tall_complexity,
                    density <= ctx.sparse_text_density,
                ];
                let supports = [density >= ctx.dense_text_density];
                (count(&contradictions), count(&supports))
            }
        };
        // A decision that fell back to the default side has nothing backing it.
        if formula_type.has_reason(Reason::TieBreak)
            || formula_type.has_reason(Reason::InsufficientEvidence)
        {
            contradictions += 1;
        }

        let base = clamp_unit(formula_type.confidence);
        let kept = (1.0 - ctx.contradiction_penalty).powi(contradictions as i32);
        clamp_unit(base * kept + ctx.support_bonus * supports as f64)
    }
}

/// Boundary tightness, unchanged apart from the range guard.
pub fn boundary_clarity(tightness: f64) -> f64 {
    clamp_unit(tightness)
}

fn count(flags: &[bool]) -> usize {
    flags.iter().filter(|f| **f).count()
}
