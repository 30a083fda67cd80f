//! Geometric layout rules voting for display or inline.
//!
//! Each rule is a plain predicate over the region's geometry and its page
//! context. Weights and sides are looked up separately, so the table only
//! decides which rules fire.

use crate::geometry::{ImageRegion, RegionContext, VSpan};
use crate::utils::EPSILON;

use super::params::FormulaTypeParams;
use super::reason::Reason;

/// Region geometry with its page context, computed once per classification.
pub(crate) struct Layout<'a> {
    pub region: &'a ImageRegion,
    pub span: VSpan,
    pub context: &'a RegionContext,
}

impl<'a> Layout<'a> {
    pub fn new(region: &'a ImageRegion, context: &'a RegionContext) -> Self {
        Self {
            region,
            span: region.span(),
            context,
        }
    }

    fn has_text(&self) -> bool {
        !self.context.text_lines.is_empty()
    }

    fn any_line_intersects(&self) -> bool {
        self.context
            .text_lines
            .iter()
            .any(|line| line.span().intersects(&self.span))
    }
}

type Predicate = fn(&Layout<'_>, &FormulaTypeParams) -> bool;

pub(crate) struct Rule {
    pub reason: Reason,
    pub applies: Predicate,
}

/// Rules in evaluation order; reasoning is reported in this order.
pub(crate) const RULES: [Rule; 8] = [
    Rule {
        reason: Reason::VerticalIsolation,
        applies: vertical_isolation,
    },
    Rule {
        reason: Reason::HorizontalCentering,
        applies: horizontal_centering,
    },
    Rule {
        reason: Reason::LargeSize,
        applies: large_size,
    },
    Rule {
        reason: Reason::NoTextOnSameLine,
        applies: no_text_on_same_line,
    },
    Rule {
        reason: Reason::AlignedWithText,
        applies: aligned_with_text,
    },
    Rule {
        reason: Reason::SharesBaseline,
        applies: shares_baseline,
    },
    Rule {
        reason: Reason::SmallHeight,
        applies: small_height,
    },
    Rule {
        reason: Reason::SurroundedByText,
        applies: surrounded_by_text,
    },
];

/// Generous whitespace to the nearest text line both above and below, with
/// no line cutting through the region.
fn vertical_isolation(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    if layout.any_line_intersects() {
        return false;
    }
    let ctx = layout.context;
    let above = ctx.nearest_line_above(&layout.span);
    let below = ctx.nearest_line_below(&layout.span);
    matches!(
        (above, below),
        (Some((_, gap_above)), Some((_, gap_below)))
            if gap_above >= params.gap_threshold && gap_below >= params.gap_threshold
    )
}

fn horizontal_centering(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    let ctx = layout.context;
    if ctx.page_width <= EPSILON {
        return false;
    }
    let offset = (layout.region.center_x() - ctx.page_center_x()).abs();
    offset <= params.center_tolerance * ctx.page_width
}

fn large_size(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    layout.region.height >= params.large_height_threshold
}

/// Requires at least one text line; an empty page says nothing about lines.
fn no_text_on_same_line(layout: &Layout<'_>, _params: &FormulaTypeParams) -> bool {
    layout.has_text() && !layout.any_line_intersects()
}

fn aligned_with_text(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    layout
        .context
        .text_lines
        .iter()
        .any(|line| layout.span.overlap_ratio(&line.span()) > params.min_overlap_ratio)
}

fn shares_baseline(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    let region = layout.region;
    layout.context.text_lines.iter().any(|line| {
        if (line.y - region.y).abs() > params.baseline_epsilon {
            return false;
        }
        let taller = line.height.max(region.height);
        if taller <= EPSILON {
            return true;
        }
        line.height.min(region.height) / taller >= params.baseline_height_ratio
    })
}

fn small_height(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    layout.region.height <= params.small_height_threshold
}

/// Text sits within crowding distance on both sides. Overlapping lines count
/// toward the side their center falls on.
fn surrounded_by_text(layout: &Layout<'_>, params: &FormulaTypeParams) -> bool {
    let span = layout.span;
    let center = span.center();
    let mut above = false;
    let mut below = false;
    for line in &layout.context.text_lines {
        let line_span = line.span();
        let line_center = line_span.center();
        if line_center < center && span.top - line_span.bottom < params.crowded_distance {
            above = true;
        } else if line_center > center && line_span.top - span.bottom < params.crowded_distance
        {
            below = true;
        }
        if above && below {
            return true;
        }
    }
    false
}
