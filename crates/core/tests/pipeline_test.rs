//! Tests for page evaluation and engine configuration.

use mathzone_core::classification::{ClassificationResult, ContentType, RefinedBoundary};
use mathzone_core::confidence::{ConfidenceLevel, ReviewDecision};
use mathzone_core::error::MathzoneError;
use mathzone_core::features::MathFeatures;
use mathzone_core::formula::{FormulaType, Reason};
use mathzone_core::geometry::{ImageRegion, TextLine};
use mathzone_core::pipeline::{Engine, EngineConfig, PageObservation, RegionObservation};

fn observation(region: ImageRegion, tightness: f64, features: MathFeatures) -> RegionObservation {
    let boundary = RefinedBoundary::new(
        region.x,
        region.y,
        region.width,
        region.height,
        Vec::new(),
        tightness,
    );
    RegionObservation {
        region,
        boundary: Some(boundary),
        features,
        classification: ClassificationResult::new(ContentType::Formula, 0.9),
    }
}

fn sample_page() -> PageObservation {
    let strong = MathFeatures {
        has_integral_symbols: true,
        has_fraction_lines: true,
        has_greek_letters: true,
        vertical_complexity: 0.5,
        ..MathFeatures::default()
    };
    PageObservation {
        page_number: Some(3),
        page_width: 800.0,
        page_height: 1000.0,
        text_lines: vec![
            TextLine::new(200.0, 20.0),
            TextLine::new(400.0, 20.0),
            TextLine::new(600.0, 20.0),
        ],
        regions: vec![
            observation(ImageRegion::new(200.0, 300.0, 200.0, 50.0), 0.85, strong),
            observation(
                ImageRegion::new(200.0, 600.0, 50.0, 20.0),
                0.6,
                MathFeatures::default(),
            ),
        ],
    }
}

#[test]
fn test_evaluate_page_keeps_region_order() {
    let engine = Engine::default();
    let page = sample_page();
    let eval = engine.evaluate_page(&page);

    assert_eq!(eval.page_number, Some(3));
    assert_eq!(eval.regions.len(), 2);
    assert_eq!(eval.regions[0].index, 0);
    assert_eq!(eval.regions[1].index, 1);

    assert_eq!(eval.regions[0].formula_type.formula_type, FormulaType::Display);
    assert!(eval.regions[0].formula_type.has_reason(Reason::VerticalIsolation));
    assert_eq!(eval.regions[1].formula_type.formula_type, FormulaType::Inline);
    assert!(eval.regions[1].formula_type.has_reason(Reason::SharesBaseline));
}

#[test]
fn test_evaluate_page_gates_review() {
    let eval = Engine::default().evaluate_page(&sample_page());

    assert_eq!(eval.regions[0].score.level, ConfidenceLevel::High);
    assert_eq!(eval.regions[0].review, ReviewDecision::AutoAccept);
    assert_eq!(eval.regions[1].review, ReviewDecision::ManualReview);
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let engine = Engine::default();
    let pages: Vec<PageObservation> = (0..8)
        .map(|i| {
            let mut page = sample_page();
            page.page_number = Some(i);
            page
        })
        .collect();

    let sequential: Vec<_> = pages.iter().map(|p| engine.evaluate_page(p)).collect();
    let parallel = engine.evaluate_pages(&pages);
    let pooled = engine.evaluate_pages_with_threads(&pages, 2).unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(pooled, sequential);
    let numbers: Vec<_> = parallel.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, (0..8).map(Some).collect::<Vec<_>>());
}

#[test]
fn test_empty_page_yields_no_regions() {
    let page = PageObservation {
        page_width: 800.0,
        page_height: 1000.0,
        ..PageObservation::default()
    };
    assert!(Engine::default().evaluate_page(&page).regions.is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_partial_json_config_overrides_named_fields() {
    let config = EngineConfig::from_json_str(
        r#"{
            "formula": { "gap_threshold": 45.0, "tie_break": "display" },
            "confidence": { "levels": { "medium": 0.5 } }
        }"#,
    )
    .unwrap();

    assert_eq!(config.formula.gap_threshold, 45.0);
    assert_eq!(config.formula.tie_break, FormulaType::Display);
    assert_eq!(config.formula.small_height_threshold, 30.0);
    assert_eq!(config.confidence.levels.medium, 0.5);
    assert_eq!(config.confidence.levels.high, 0.9);
}

#[test]
fn test_empty_json_config_is_default() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_invalid_json_config_is_rejected() {
    let err = EngineConfig::from_json_str(
        r#"{ "confidence": { "dimensions": { "feature_match": 0.9 } } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, MathzoneError::InvalidConfig { .. }), "{err}");

    let err = EngineConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, MathzoneError::Json(_)), "{err}");
}

#[test]
fn test_page_observation_decodes_from_json() {
    let page: PageObservation = serde_json::from_str(
        r#"{
            "page_width": 800, "page_height": 1000,
            "text_lines": [{"y": 200, "height": 20}],
            "regions": [{
                "region": {"x": 200, "y": 200, "width": 50, "height": 20},
                "classification": {"type": "formula", "confidence": 0.8}
            }]
        }"#,
    )
    .unwrap();

    assert_eq!(page.regions.len(), 1);
    assert!(page.regions[0].boundary.is_none());

    let eval = Engine::default().evaluate_page(&page);
    assert_eq!(eval.regions[0].formula_type.formula_type, FormulaType::Inline);
    assert_eq!(eval.regions[0].score.breakdown.boundary_clarity, 0.0);
}

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
    assert_send_sync::<PageObservation>();
    assert_send_sync::<mathzone_core::pipeline::PageEvaluation>();
    assert_send_sync::<mathzone_core::confidence::ConfidenceScore>();
    assert_send_sync::<mathzone_core::formula::FormulaTypeResult>();
}

#[test]
fn test_config_path_errors() {
    let err = EngineConfig::from_json_path("no/such/config.json").unwrap_err();
    assert!(matches!(err, MathzoneError::Io(_)), "{err}");

    let path = std::env::temp_dir().join(format!("mathzone-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "formula": { "gap_threshold": 40.0 } }"#).unwrap();
    let config = EngineConfig::from_json_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.formula.gap_threshold, 40.0);
}
