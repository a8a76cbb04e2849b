//! Hit-testing and lasso selection.

use crate::bounds::{hit_padding, padded_bounds, stroke_bounds};
use crate::stroke::{ShapeKind, Stroke, StrokeId};
use kurbo::Point;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Does the stroke's outline require per-segment distance checks?
///
/// Lines and arrows are shapes whose visual extent is a single segment, so
/// box containment alone would make the whole diagonal's bounding box
/// clickable.
fn needs_segment_test(stroke: &Stroke) -> bool {
    if stroke.is_freehand() {
        return true;
    }
    matches!(stroke.shape, Some(ShapeKind::Line) | Some(ShapeKind::Arrow))
}

/// Test whether a scene point hits a single stroke.
pub fn hit_test(point: Point, stroke: &Stroke) -> bool {
    if stroke.points.is_empty() {
        return false;
    }

    let padded = padded_bounds(stroke);
    if !padded.contains(point) {
        return false;
    }

    if !needs_segment_test(stroke) {
        // Filled shapes and text: the padded box is the hit area.
        return true;
    }

    let padding = hit_padding(stroke);
    if stroke.points.len() == 1 {
        let d = (point - stroke.points[0]).hypot();
        return d <= padding;
    }
    stroke
        .points
        .windows(2)
        .any(|w| point_to_segment_dist(point, w[0], w[1]) <= padding)
}

/// Find the topmost stroke at a scene point.
///
/// Strokes are stored back-to-front, so iterate newest to oldest and stop at
/// the first hit.
pub fn stroke_at_point<'a>(point: Point, strokes: &'a [Stroke]) -> Option<&'a Stroke> {
    strokes.iter().rev().find(|s| hit_test(point, s))
}

/// Point-in-polygon via the ray-casting odd-even rule.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Stride for down-sampling freehand strokes during lasso tests.
const LASSO_SAMPLE_STRIDE: usize = 5;

/// Test whether a stroke falls inside a closed lasso polygon.
///
/// Shape and text strokes are selected when any bounding-box corner lies
/// inside the polygon. Freehand strokes test a down-sampled subset of their
/// points (first, last, and every 5th in between) to keep long strokes cheap.
pub fn stroke_in_lasso(stroke: &Stroke, lasso: &[Point]) -> bool {
    if lasso.len() < 3 || stroke.points.is_empty() {
        return false;
    }

    if stroke.is_text() || stroke.is_shape() {
        return stroke_bounds(stroke)
            .corners()
            .iter()
            .any(|c| point_in_polygon(*c, lasso));
    }

    if point_in_polygon(stroke.points[0], lasso) {
        return true;
    }
    if stroke
        .points
        .iter()
        .skip(LASSO_SAMPLE_STRIDE)
        .step_by(LASSO_SAMPLE_STRIDE)
        .any(|p| point_in_polygon(*p, lasso))
    {
        return true;
    }
    stroke.points.len() > 1 && point_in_polygon(stroke.points[stroke.points.len() - 1], lasso)
}

/// Ids of all strokes inside a lasso polygon, in z-order.
pub fn strokes_in_lasso(strokes: &[Stroke], lasso: &[Point]) -> Vec<StrokeId> {
    strokes
        .iter()
        .filter(|s| stroke_in_lasso(s, lasso))
        .map(|s| s.id)
        .collect()
}
