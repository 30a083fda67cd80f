//! Page-level evaluation: classify and score every candidate region of a page.
//!
//! Provides:
//! - `EngineConfig` - root configuration, decodable from JSON
//! - `Engine::evaluate_page()` - all regions of one page, in parallel
//! - `Engine::evaluate_pages()` - many pages, in parallel, in input order

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classification::{ClassificationResult, RefinedBoundary};
use crate::confidence::{
    ConfidenceParams, ConfidenceScore, ConfidenceScorer, DetectionCandidate, ReviewDecision,
};
use crate::error::{MathzoneError, Result};
use crate::features::MathFeatures;
use crate::formula::{FormulaTypeClassifier, FormulaTypeParams, FormulaTypeResult};
use crate::geometry::{ImageRegion, RegionContext, TextLine};

/// Root configuration of the classifier and the scorer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub formula: FormulaTypeParams,
    pub confidence: ConfidenceParams,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.formula.validate()?;
        self.confidence.validate()
    }

    /// Decodes a (possibly partial) JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file. A file that cannot be opened is an
    /// [`MathzoneError::Io`].
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_json_reader(BufReader::new(file))
    }
}

/// Upstream outputs for one candidate region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionObservation {
    pub region: ImageRegion,
    /// Missing when no boundary refinement took place.
    #[serde(default)]
    pub boundary: Option<RefinedBoundary>,
    #[serde(default)]
    pub features: MathFeatures,
    pub classification: ClassificationResult,
}

/// One page worth of layout and region observations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageObservation {
    #[serde(default)]
    pub page_number: Option<u32>,
    pub page_width: f64,
    pub page_height: f64,
    #[serde(default)]
    pub text_lines: Vec<TextLine>,
    #[serde(default)]
    pub regions: Vec<RegionObservation>,
}

impl PageObservation {
    /// Layout context shared by every region of the page. Siblings carry
    /// geometry only.
    pub fn context(&self) -> RegionContext {
        RegionContext::new(self.page_width, self.page_height)
            .with_text_lines(self.text_lines.clone())
            .with_siblings(
                self.regions
                    .iter()
                    .map(|obs| obs.region.geometry_only())
                    .collect(),
            )
    }
}

/// Decision and score for one region, indexed by its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEvaluation {
    pub index: usize,
    pub formula_type: FormulaTypeResult,
    pub score: ConfidenceScore,
    pub review: ReviewDecision,
}

/// Evaluations of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEvaluation {
    pub page_number: Option<u32>,
    pub regions: Vec<RegionEvaluation>,
}

/// Classifier and scorer sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    classifier: FormulaTypeClassifier,
    scorer: ConfidenceScorer,
}

impl Engine {
    /// Builds an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: FormulaTypeClassifier::new(config.formula),
            scorer: ConfidenceScorer::new(config.confidence),
        })
    }

    pub fn classifier(&self) -> &FormulaTypeClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    /// Classifies a region and assembles its detection candidate. The
    /// candidate carries the region geometry without pixel buffers.
    pub fn detect(
        &self,
        observation: &RegionObservation,
        context: &RegionContext,
    ) -> DetectionCandidate {
        let formula_type = self.classifier.classify(&observation.region, context);
        let boundary = observation
            .boundary
            .clone()
            .unwrap_or_else(|| RefinedBoundary::unrefined(&observation.region));
        DetectionCandidate::new(observation.region.geometry_only(), boundary, formula_type)
    }

    /// Detects and scores one region.
    pub fn evaluate_region(
        &self,
        index: usize,
        observation: &RegionObservation,
        context: &RegionContext,
    ) -> RegionEvaluation {
        let detection = self.detect(observation, context);
        let score = self.scorer.score(
            &detection,
            &observation.features,
            &observation.classification,
        );
        let review = self.scorer.review(&score);
        RegionEvaluation {
            index,
            formula_type: detection.formula_type,
            score,
            review,
        }
    }

    /// Evaluates every region of a page in parallel. Output order follows the
    /// input order.
    pub fn evaluate_page(&self, page: &PageObservation) -> PageEvaluation {
        let context = page.context();
        let regions: Vec<RegionEvaluation> = page
            .regions
            .par_iter()
            .enumerate()
            .map(|(index, obs)| self.evaluate_region(index, obs, &context))
            .collect();
        debug!(
            page = ?page.page_number,
            regions = regions.len(),
            "evaluated page"
        );
        PageEvaluation {
            page_number: page.page_number,
            regions,
        }
    }

    /// Evaluates many pages on the global rayon pool.
    pub fn evaluate_pages(&self, pages: &[PageObservation]) -> Vec<PageEvaluation> {
        pages
            .par_iter()
            .map(|page| self.evaluate_page(page))
            .collect()
    }

    /// Evaluates many pages on a dedicated pool of `threads` workers.
    pub fn evaluate_pages_with_threads(
        &self,
        pages: &[PageObservation],
        threads: usize,
    ) -> Result<Vec<PageEvaluation>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| MathzoneError::ThreadPool(e.to_string()))?;
        Ok(pool.install(|| self.evaluate_pages(pages)))
    }
}
