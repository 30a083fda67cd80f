//! mathzone - display/inline formula classification and detection confidence
//! scoring for document OCR pipelines.
//!
//! The library is a pure decision layer over measurements produced upstream
//! (region geometry, text lines, pixel features, content-type labels, refined
//! boundaries). It performs no I/O of its own.

pub mod classification;
pub mod confidence;
pub mod error;
pub mod features;
pub mod formula;
pub mod geometry;
pub mod pipeline;
pub mod utils;

pub use classification::{ClassificationResult, ContentType, RefinedBoundary};
pub use confidence::{
    ConfidenceBreakdown, ConfidenceLevel, ConfidenceParams, ConfidenceScore, ConfidenceScorer,
    DetectionCandidate, ReviewDecision,
};
pub use error::{MathzoneError, Result};
pub use features::{HorizontalAlignment, MathFeatures, VerticalAlignment};
pub use formula::{
    FormulaType, FormulaTypeClassifier, FormulaTypeParams, FormulaTypeResult, Reason,
};
pub use geometry::{ImageRegion, RegionContext, TextLine};
pub use pipeline::{
    Engine, EngineConfig, PageEvaluation, PageObservation, RegionEvaluation, RegionObservation,
};
