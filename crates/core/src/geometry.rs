//! Page geometry: candidate regions, text lines and the page-level context.
//!
//! Coordinates use a top-left origin in page pixels: `y` grows downward, so a
//! region's `top` is `y` and its `bottom` is `y + height`.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::utils::EPSILON;

/// A closed vertical interval `[top, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VSpan {
    pub top: f64,
    pub bottom: f64,
}

impl VSpan {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height.max(0.0),
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Length of the shared part of two spans, 0 when they are disjoint.
    pub fn overlap(&self, other: &VSpan) -> f64 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    /// Overlap relative to the shorter of the two spans.
    ///
    /// Zero-height spans have no measurable overlap and yield 0.
    pub fn overlap_ratio(&self, other: &VSpan) -> f64 {
        let shorter = self.height().min(other.height());
        if shorter <= EPSILON {
            return 0.0;
        }
        self.overlap(other) / shorter
    }

    /// True when the spans share any part of their extent, endpoints excluded.
    pub fn intersects(&self, other: &VSpan) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }
}

/// A rectangular sub-area of a page believed to hold one content block.
///
/// The pixel buffers are carried through untouched; layout decisions only
/// read the geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Raw grayscale pixels, row-major.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pixels: Vec<u8>,
    /// Thresholded mask, one byte per pixel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mask: Vec<u8>,
}

impl ImageRegion {
    /// Creates a region with geometry only.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            pixels: Vec::new(),
            mask: Vec::new(),
        }
    }

    pub fn with_buffers(mut self, pixels: Vec<u8>, mask: Vec<u8>) -> Self {
        self.pixels = pixels;
        self.mask = mask;
        self
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn span(&self) -> VSpan {
        VSpan::new(self.y, self.height)
    }

    /// Copy of the region without its pixel buffers.
    pub fn geometry_only(&self) -> Self {
        Self::new(self.x, self.y, self.width, self.height)
    }
}

/// A detected band of running prose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub y: f64,
    pub height: f64,
}

impl TextLine {
    pub fn new(y: f64, height: f64) -> Self {
        Self { y, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn span(&self) -> VSpan {
        VSpan::new(self.y, self.height)
    }
}

/// Page-level layout context for a region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionContext {
    pub page_width: f64,
    pub page_height: f64,
    /// Other regions detected on the same page.
    #[serde(default)]
    pub siblings: Vec<ImageRegion>,
    #[serde(default)]
    pub text_lines: Vec<TextLine>,
}

impl RegionContext {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            siblings: Vec::new(),
            text_lines: Vec::new(),
        }
    }

    pub fn with_text_lines(mut self, text_lines: Vec<TextLine>) -> Self {
        self.text_lines = text_lines;
        self
    }

    pub fn with_siblings(mut self, siblings: Vec<ImageRegion>) -> Self {
        self.siblings = siblings;
        self
    }

    pub fn page_center_x(&self) -> f64 {
        self.page_width / 2.0
    }

    /// Closest text line lying entirely above `span`, with the whitespace gap
    /// between its bottom edge and the span's top.
    pub fn nearest_line_above(&self, span: &VSpan) -> Option<(&TextLine, f64)> {
        self.text_lines
            .iter()
            .filter(|line| line.bottom() <= span.top)
            .map(|line| (line, span.top - line.bottom()))
            .min_by_key(|(_, gap)| OrderedFloat(*gap))
    }

    /// Closest text line lying entirely below `span`, with the whitespace gap
    /// between the span's bottom and the line's top edge.
    pub fn nearest_line_below(&self, span: &VSpan) -> Option<(&TextLine, f64)> {
        self.text_lines
            .iter()
            .filter(|line| line.y >= span.bottom)
            .map(|line| (line, line.y - span.bottom))
            .min_by_key(|(_, gap)| OrderedFloat(*gap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::approx_eq;

    #[test]
    fn overlap_of_disjoint_spans_is_zero() {
        let a = VSpan::new(0.0, 10.0);
        let b = VSpan::new(20.0, 10.0);
        assert_eq!(a.overlap(&b), 0.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn touching_spans_do_not_intersect() {
        let a = VSpan::new(0.0, 10.0);
        let b = VSpan::new(10.0, 5.0);
        assert_eq!(a.overlap(&b), 0.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlap_ratio_uses_shorter_span() {
        let line = VSpan::new(200.0, 20.0);
        let region = VSpan::new(205.0, 20.0);
        assert!(approx_eq(region.overlap_ratio(&line), 0.75, EPSILON));
        assert_eq!(VSpan::new(0.0, 0.0).overlap_ratio(&line), 0.0);
    }

    #[test]
    fn negative_height_collapses_to_empty_span() {
        let span = VSpan::new(5.0, -3.0);
        assert_eq!(span.height(), 0.0);
    }

    #[test]
    fn nearest_lines_pick_smallest_gap() {
        let ctx = RegionContext::new(800.0, 1000.0).with_text_lines(vec![
            TextLine::new(100.0, 20.0),
            TextLine::new(200.0, 20.0),
            TextLine::new(400.0, 20.0),
            TextLine::new(600.0, 20.0),
        ]);
        let span = VSpan::new(300.0, 50.0);

        let (above, gap_above) = ctx.nearest_line_above(&span).unwrap();
        assert_eq!(above.y, 200.0);
        assert_eq!(gap_above, 80.0);

        let (below, gap_below) = ctx.nearest_line_below(&span).unwrap();
        assert_eq!(below.y, 400.0);
        assert_eq!(gap_below, 50.0);
    }

    #[test]
    fn geometry_only_drops_buffers() {
        let region = ImageRegion::new(1.0, 2.0, 3.0, 2.0).with_buffers(vec![0; 6], vec![1; 6]);
        let bare = region.geometry_only();
        assert!(bare.pixels.is_empty() && bare.mask.is_empty());
        assert_eq!((bare.x, bare.y, bare.width, bare.height), (1.0, 2.0, 3.0, 2.0));
    }
}
