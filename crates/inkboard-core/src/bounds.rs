//! Stroke bounding boxes.
//!
//! `stroke_bounds` is the one bounds function in the crate. Hit-testing,
//! selection handle placement and the resize math all call it; a second
//! implementation anywhere would let the visible selection outline drift
//! away from actual hit/resize behavior.

use crate::stroke::Stroke;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Average glyph width as a fraction of font size, used to estimate text
/// extents without a font backend.
const AVG_CHAR_WIDTH: f64 = 0.6;

/// Line-height multiplier for text strokes.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// An axis-aligned bounding box in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Expand by `pad` on all four sides.
    pub fn inflate(&self, pad: f64) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }
}

/// Compute the bounding box for any stroke kind.
///
/// Text extents are estimated from character count since the engine has no
/// font backend; the anchor point is the TOP-left of the text box, not the
/// baseline.
pub fn stroke_bounds(stroke: &Stroke) -> Bounds {
    if stroke.points.is_empty() {
        return Bounds::default();
    }

    if stroke.is_text() {
        let anchor = stroke.points[0];
        let font_size = stroke.effective_font_size();
        let chars = stroke.text.as_deref().map_or(0, |t| t.chars().count());
        let width = (chars as f64 * font_size * AVG_CHAR_WIDTH).max(font_size);
        let height = font_size * TEXT_LINE_HEIGHT;
        return Bounds::new(anchor.x, anchor.y, width, height);
    }

    if let Some((start, end)) = stroke.shape_endpoints() {
        let min_x = start.x.min(end.x);
        let min_y = start.y.min(end.y);
        return Bounds::new(
            min_x,
            min_y,
            (start.x - end.x).abs(),
            (start.y - end.y).abs(),
        );
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &stroke.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Hit padding for a stroke: wide strokes get a proportionally larger halo,
/// thin ones a 10-unit floor so they stay clickable.
pub fn hit_padding(stroke: &Stroke) -> f64 {
    (stroke.width * 2.0).max(10.0)
}

/// The stroke's bounds expanded by its hit padding.
pub fn padded_bounds(stroke: &Stroke) -> Bounds {
    stroke_bounds(stroke).inflate(hit_padding(stroke))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{ShapeKind, Tool};
    use crate::testutil::stroke_with_points;

    #[test]
    fn test_empty_stroke_zero_bounds() {
        let s = stroke_with_points(Tool::Pen, vec![]);
        assert_eq!(stroke_bounds(&s), Bounds::default());
    }

    #[test]
    fn test_shape_bounds_from_endpoints() {
        let s = stroke_with_points(
            Tool::Rectangle,
            vec![Point::new(110.0, 60.0), Point::new(10.0, 10.0)],
        );
        assert_eq!(s.shape, Some(ShapeKind::Rectangle));
        let b = stroke_bounds(&s);
        assert_eq!(b, Bounds::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_freehand_bounds_cover_all_points() {
        let s = stroke_with_points(
            Tool::Pen,
            vec![
                Point::new(5.0, 20.0),
                Point::new(-3.0, 7.0),
                Point::new(12.0, 9.0),
            ],
        );
        let b = stroke_bounds(&s);
        assert_eq!(b, Bounds::new(-3.0, 7.0, 15.0, 13.0));
        assert!(b.width >= 0.0 && b.height >= 0.0);
    }

    #[test]
    fn test_text_bounds_use_font_metrics() {
        let mut s = stroke_with_points(Tool::Text, vec![Point::new(40.0, 50.0)]);
        s.text = Some("hello".to_string());
        s.font_size = Some(20.0);
        let b = stroke_bounds(&s);
        assert_eq!(b.x, 40.0);
        assert_eq!(b.y, 50.0);
        assert!((b.width - 5.0 * 20.0 * 0.6).abs() < 1e-9);
        assert!((b.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_bounds_never_narrower_than_font_size() {
        let mut s = stroke_with_points(Tool::Text, vec![Point::new(0.0, 0.0)]);
        s.text = Some("i".to_string());
        s.font_size = Some(30.0);
        assert!((stroke_bounds(&s).width - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_padding_floor() {
        let mut s = stroke_with_points(Tool::Pen, vec![Point::new(0.0, 0.0)]);
        s.width = 2.0;
        assert!((hit_padding(&s) - 10.0).abs() < f64::EPSILON);
        s.width = 8.0;
        assert!((hit_padding(&s) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_padded_bounds_inflate() {
        let s = stroke_with_points(
            Tool::Pen,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
        );
        let b = padded_bounds(&s);
        assert_eq!(b, Bounds::new(-10.0, -10.0, 30.0, 30.0));
    }
}
