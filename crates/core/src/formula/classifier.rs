//! Vote-tally classifier deciding between display and inline formulas.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::geometry::{ImageRegion, RegionContext};
use crate::utils::{EPSILON, approx_eq, clamp_unit, safe_ratio};

use super::params::FormulaTypeParams;
use super::reason::Reason;
use super::rules::{Layout, RULES};
use super::types::{FormulaType, FormulaTypeResult};

/// Accumulated votes of the rules that fired for one region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    pub display_weight: f64,
    pub inline_weight: f64,
    pub display_rules: usize,
    pub inline_rules: usize,
    pub fired: SmallVec<[Reason; 8]>,
}

impl VoteTally {
    fn cast(&mut self, reason: Reason, side: FormulaType, weight: f64) {
        match side {
            FormulaType::Display => {
                self.display_weight += weight;
                self.display_rules += 1;
            }
            FormulaType::Inline => {
                self.inline_weight += weight;
                self.inline_rules += 1;
            }
        }
        self.fired.push(reason);
    }

    pub fn weight(&self, side: FormulaType) -> f64 {
        match side {
            FormulaType::Display => self.display_weight,
            FormulaType::Inline => self.inline_weight,
        }
    }

    pub fn rules(&self, side: FormulaType) -> usize {
        match side {
            FormulaType::Display => self.display_rules,
            FormulaType::Inline => self.inline_rules,
        }
    }

    pub fn is_tied(&self) -> bool {
        approx_eq(self.display_weight, self.inline_weight, EPSILON)
    }
}

/// Decides whether a region holds a display or an inline formula from its
/// geometry and the surrounding text lines.
///
/// Classification is pure: the same region and context always give the same
/// result, and it can run concurrently for any number of regions.
#[derive(Debug, Clone, Default)]
pub struct FormulaTypeClassifier {
    params: FormulaTypeParams,
}

impl FormulaTypeClassifier {
    pub fn new(params: FormulaTypeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FormulaTypeParams {
        &self.params
    }

    /// Classifies a region. Never fails; with no text lines on the page only
    /// the size and centering rules can fire.
    pub fn classify(&self, region: &ImageRegion, context: &RegionContext) -> FormulaTypeResult {
        let tally = self.tally(region, context);
        let result = self.decide(&tally);
        debug!(
            formula_type = %result.formula_type,
            display_weight = tally.display_weight,
            inline_weight = tally.inline_weight,
            confidence = result.confidence,
            "classified formula region"
        );
        result
    }

    /// Evaluates every rule once and accumulates the votes.
    pub fn tally(&self, region: &ImageRegion, context: &RegionContext) -> VoteTally {
        let layout = Layout::new(region, context);
        let mut tally = VoteTally::default();
        for rule in &RULES {
            if !(rule.applies)(&layout, &self.params) {
                continue;
            }
            let Some(side) = rule.reason.side() else {
                continue;
            };
            let weight = self.params.weights.weight(rule.reason);
            trace!(rule = ?rule.reason, %side, weight, "layout rule fired");
            tally.cast(rule.reason, side, weight);
        }
        tally
    }

    /// Reduces a tally to a decision.
    ///
    /// Confidence grows with the normalized weight margin and with the number
    /// of rules backing the winning side.
    pub fn decide(&self, tally: &VoteTally) -> FormulaTypeResult {
        let params = &self.params;

        if tally.fired.is_empty() {
            return FormulaTypeResult {
                formula_type: params.tie_break,
                confidence: clamp_unit(params.base_confidence),
                reasoning: vec![Reason::InsufficientEvidence],
            };
        }

        let tied = tally.is_tied();
        let winner = if tied {
            params.tie_break
        } else if tally.display_weight > tally.inline_weight {
            FormulaType::Display
        } else {
            FormulaType::Inline
        };

        let total = tally.display_weight + tally.inline_weight;
        let margin = if tied {
            0.0
        } else {
            safe_ratio(
                tally.weight(winner) - tally.weight(winner.opposite()),
                total,
            )
        };
        let confidence = clamp_unit(
            params.base_confidence
                + params.margin_gain * margin
                + params.per_rule_gain * tally.rules(winner) as f64,
        );

        let mut reasoning: Vec<Reason> = tally.fired.to_vec();
        if tied {
            reasoning.push(Reason::TieBreak);
        }

        FormulaTypeResult {
            formula_type: winner,
            confidence,
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(display: &[Reason], inline: &[Reason]) -> VoteTally {
        let weights = FormulaTypeParams::default().weights;
        let mut t = VoteTally::default();
        for &r in display {
            t.cast(r, FormulaType::Display, weights.weight(r));
        }
        for &r in inline {
            t.cast(r, FormulaType::Inline, weights.weight(r));
        }
        t
    }

    #[test]
    fn empty_tally_uses_default_side() {
        let classifier = FormulaTypeClassifier::default();
        let result = classifier.decide(&VoteTally::default());
        assert_eq!(result.formula_type, FormulaType::Inline);
        assert_eq!(result.reasoning, vec![Reason::InsufficientEvidence]);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn tie_picks_configured_side_and_says_so() {
        // 1.5 + 1.5 display vs 2.0 + 1.0 inline.
        let t = tally(
            &[Reason::HorizontalCentering, Reason::NoTextOnSameLine],
            &[Reason::AlignedWithText, Reason::SmallHeight],
        );
        assert!(t.is_tied());

        let result = FormulaTypeClassifier::default().decide(&t);
        assert_eq!(result.formula_type, FormulaType::Inline);
        assert_eq!(result.reasoning.last(), Some(&Reason::TieBreak));

        let display_first = FormulaTypeClassifier::new(FormulaTypeParams {
            tie_break: FormulaType::Display,
            ..FormulaTypeParams::default()
        });
        assert_eq!(
            display_first.decide(&t).formula_type,
            FormulaType::Display
        );
    }

    #[test]
    fn confidence_grows_with_margin_and_rule_count() {
        let classifier = FormulaTypeClassifier::default();
        let narrow = classifier.decide(&tally(
            &[Reason::VerticalIsolation],
            &[Reason::AlignedWithText],
        ));
        let wide = classifier.decide(&tally(&[Reason::VerticalIsolation], &[]));
        let wider = classifier.decide(&tally(
            &[Reason::VerticalIsolation, Reason::NoTextOnSameLine],
            &[],
        ));
        assert!(narrow.confidence < wide.confidence);
        assert!(wide.confidence < wider.confidence);
    }

    #[test]
    fn confidence_is_clamped() {
        let classifier = FormulaTypeClassifier::new(FormulaTypeParams {
            base_confidence: 1.0,
            per_rule_gain: 1.0,
            ..FormulaTypeParams::default()
        });
        let result = classifier.decide(&tally(&[Reason::LargeSize], &[]));
        assert_eq!(result.confidence, 1.0);
    }
}
