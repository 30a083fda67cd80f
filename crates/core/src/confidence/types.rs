//! Confidence score types and the scored detection unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classification::RefinedBoundary;
use crate::formula::FormulaTypeResult;
use crate::geometry::ImageRegion;

/// Discrete confidence bucket. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(format!("unknown confidence level: {other}")),
        }
    }
}

/// Per-dimension scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub feature_match: f64,
    pub classification_certainty: f64,
    pub boundary_clarity: f64,
    pub context_consistency: f64,
}

/// Whether a detection can be used as-is or needs a human look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    AutoAccept,
    ManualReview,
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewDecision::AutoAccept => "auto_accept",
            ReviewDecision::ManualReview => "manual_review",
        })
    }
}

/// Overall trust in the detection pipeline's output for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub overall: f64,
    pub level: ConfidenceLevel,
    pub breakdown: ConfidenceBreakdown,
}

impl ConfidenceScore {
    /// Accepts the detection when its level reaches `auto_accept_level`.
    pub fn review(&self, auto_accept_level: ConfidenceLevel) -> ReviewDecision {
        if self.level >= auto_accept_level {
            ReviewDecision::AutoAccept
        } else {
            ReviewDecision::ManualReview
        }
    }
}

/// A detected region together with its refined boundary and layout class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionCandidate {
    pub region: ImageRegion,
    pub boundary: RefinedBoundary,
    pub formula_type: FormulaTypeResult,
}

impl DetectionCandidate {
    pub fn new(
        region: ImageRegion,
        boundary: RefinedBoundary,
        formula_type: FormulaTypeResult,
    ) -> Self {
        Self {
            region,
            boundary,
            formula_type,
        }
    }
}
