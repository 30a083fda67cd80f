//! Outputs of the upstream content-type classifier and boundary refiner.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::ImageRegion;
use crate::utils::clamp_unit;

/// Coarse semantic label of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Formula,
    Image,
    Table,
    Text,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Formula => "formula",
            ContentType::Image => "image",
            ContentType::Table => "table",
            ContentType::Text => "text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream content-type decision for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub confidence: f64,
    /// Per-type scores; they need not sum to 1.
    #[serde(default)]
    pub scores: BTreeMap<ContentType, f64>,
    #[serde(default)]
    pub reasoning: Vec<String>,
}

impl ClassificationResult {
    /// Creates a result with the confidence clamped into `[0, 1]`.
    pub fn new(content_type: ContentType, confidence: f64) -> Self {
        Self {
            content_type,
            confidence: clamp_unit(confidence),
            scores: BTreeMap::new(),
            reasoning: Vec::new(),
        }
    }

    pub fn with_score(mut self, content_type: ContentType, score: f64) -> Self {
        self.scores.insert(content_type, score);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    pub fn is_formula(&self) -> bool {
        self.content_type == ContentType::Formula
    }
}

/// Tightened geometry around the actual content of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedBoundary {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub contour: Vec<(f64, f64)>,
    pub tightness: f64,
}

impl RefinedBoundary {
    /// Creates a boundary with tightness clamped into `[0, 1]`.
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        contour: Vec<(f64, f64)>,
        tightness: f64,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            contour,
            tightness: clamp_unit(tightness),
        }
    }

    /// The region's own rectangle, used when no refinement took place.
    pub fn unrefined(region: &ImageRegion) -> Self {
        let (x0, y0) = (region.x, region.y);
        let (x1, y1) = (region.x + region.width, region.y + region.height);
        Self::new(
            region.x,
            region.y,
            region.width,
            region.height,
            vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)],
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_and_tightness_are_clamped() {
        assert_eq!(ClassificationResult::new(ContentType::Formula, 1.4).confidence, 1.0);
        assert_eq!(ClassificationResult::new(ContentType::Text, f64::NAN).confidence, 0.0);
        let boundary = RefinedBoundary::new(0.0, 0.0, 1.0, 1.0, Vec::new(), -0.2);
        assert_eq!(boundary.tightness, 0.0);
    }

    #[test]
    fn unrefined_boundary_uses_rectangle_corners() {
        let region = ImageRegion::new(10.0, 20.0, 30.0, 40.0);
        let boundary = RefinedBoundary::unrefined(&region);
        assert_eq!(
            boundary.contour,
            vec![(10.0, 20.0), (40.0, 20.0), (40.0, 60.0), (10.0, 60.0)]
        );
        assert_eq!(boundary.tightness, 0.0);
    }

    #[test]
    fn classification_decodes_type_field() {
        let json = r#"{"type": "table", "confidence": 0.7, "scores": {"table": 0.7, "text": 0.2}}"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.content_type, ContentType::Table);
        assert_eq!(result.scores.get(&ContentType::Text), Some(&0.2));
        assert!(result.reasoning.is_empty());
    }
}
