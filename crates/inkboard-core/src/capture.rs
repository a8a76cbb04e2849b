//! Per-pointer stroke capture.
//!
//! Each live pointer owns at most one in-progress stroke, so simultaneous
//! touches draw independent strokes without interleaving points.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use kurbo::Point;
use uuid::Uuid;

use crate::input::PointerId;
use crate::stroke::{Stroke, StrokeId, Tool};

/// Opacity applied to highlighter strokes.
pub const HIGHLIGHTER_OPACITY: f64 = 0.5;

/// Pen appearance shared by new strokes.
#[derive(Debug, Clone)]
pub struct Brush {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: crate::stroke::DEFAULT_COLOR.to_string(),
            width: 5.0,
            opacity: 1.0,
        }
    }
}

/// Tracks in-progress strokes keyed by the pointer drawing them.
#[derive(Debug, Default)]
pub struct CaptureEngine {
    active: HashMap<PointerId, Stroke>,
}

impl CaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke for `pointer` at a scene point.
    ///
    /// Freehand tools seed a single point; shape tools seed anchor and
    /// opposite corner at the same position so the stroke is well-formed
    /// before the first drag. Non-drawing tools start nothing. A pointer
    /// that is already drawing keeps its current stroke.
    pub fn begin(
        &mut self,
        pointer: PointerId,
        tool: Tool,
        point: Point,
        brush: &Brush,
        page_id: &str,
    ) -> Option<StrokeId> {
        if self.active.contains_key(&pointer) {
            return None;
        }
        let points = if tool.is_freehand() {
            vec![point]
        } else if tool.is_shape() {
            vec![point, point]
        } else {
            return None;
        };
        // The highlighter always draws translucent, whatever the brush says.
        let opacity = if tool == Tool::Highlighter {
            HIGHLIGHTER_OPACITY
        } else {
            brush.opacity
        };
        let stroke = Stroke {
            id: Uuid::new_v4(),
            tool,
            points,
            color: brush.color.clone(),
            width: brush.width,
            opacity,
            page_id: page_id.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            shape: tool.shape_kind(),
            text: None,
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            text_decoration: None,
            text_align: None,
        };
        let id = stroke.id;
        self.active.insert(pointer, stroke);
        Some(id)
    }

    /// Extend the stroke owned by `pointer` with a new scene point.
    ///
    /// Freehand strokes append; shape strokes move the opposite corner.
    /// Returns false when the pointer has no active stroke.
    pub fn append(&mut self, pointer: PointerId, point: Point) -> bool {
        let Some(stroke) = self.active.get_mut(&pointer) else {
            return false;
        };
        if stroke.is_shape() {
            stroke.points[1] = point;
        } else {
            stroke.points.push(point);
        }
        true
    }

    /// Commit and return the stroke owned by `pointer`.
    ///
    /// A freehand stroke that never moved still commits as a dot.
    pub fn finish(&mut self, pointer: PointerId) -> Option<Stroke> {
        self.active.remove(&pointer)
    }

    /// Discard the stroke owned by `pointer`, if any.
    pub fn cancel(&mut self, pointer: PointerId) -> bool {
        self.active.remove(&pointer).is_some()
    }

    /// True while `pointer` is drawing.
    pub fn is_active(&self, pointer: PointerId) -> bool {
        self.active.contains_key(&pointer)
    }

    /// In-progress strokes, for rendering live feedback.
    pub fn active_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.active.values()
    }

    /// Number of pointers currently drawing.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop every in-progress stroke (page switch, tool change).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freehand_accumulates_points() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Mouse;
        engine.begin(p, Tool::Pen, Point::new(0.0, 0.0), &brush, "p1");
        engine.append(p, Point::new(1.0, 1.0));
        engine.append(p, Point::new(2.0, 2.0));
        let stroke = engine.finish(p).unwrap();
        assert_eq!(stroke.points.len(), 3);
        assert_eq!(stroke.points[2], Point::new(2.0, 2.0));
        assert!(!engine.is_active(p));
    }

    #[test]
    fn test_shape_keeps_two_points() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Touch(1);
        engine.begin(p, Tool::Rectangle, Point::new(10.0, 10.0), &brush, "p1");
        engine.append(p, Point::new(50.0, 20.0));
        engine.append(p, Point::new(80.0, 90.0));
        let stroke = engine.finish(p).unwrap();
        assert_eq!(stroke.points.len(), 2);
        assert_eq!(stroke.points[0], Point::new(10.0, 10.0));
        assert_eq!(stroke.points[1], Point::new(80.0, 90.0));
        assert_eq!(stroke.shape, Tool::Rectangle.shape_kind());
    }

    #[test]
    fn test_pointers_are_independent() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let a = PointerId::Touch(1);
        let b = PointerId::Touch(2);
        engine.begin(a, Tool::Pen, Point::new(0.0, 0.0), &brush, "p1");
        engine.begin(b, Tool::Pen, Point::new(100.0, 0.0), &brush, "p1");
        engine.append(a, Point::new(1.0, 0.0));
        engine.append(b, Point::new(101.0, 0.0));
        let sa = engine.finish(a).unwrap();
        assert!(engine.is_active(b));
        let sb = engine.finish(b).unwrap();
        assert_eq!(sa.points, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(
            sb.points,
            vec![Point::new(100.0, 0.0), Point::new(101.0, 0.0)]
        );
        assert_ne!(sa.id, sb.id);
    }

    #[test]
    fn test_non_drawing_tool_starts_nothing() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        assert!(engine
            .begin(PointerId::Mouse, Tool::Select, Point::ZERO, &brush, "p1")
            .is_none());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_begin_does_not_replace_active_stroke() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Mouse;
        let first = engine.begin(p, Tool::Pen, Point::ZERO, &brush, "p1");
        let second = engine.begin(p, Tool::Pen, Point::new(9.0, 9.0), &brush, "p1");
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(engine.finish(p).unwrap().id, first.unwrap());
    }

    #[test]
    fn test_highlighter_opacity() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Mouse;
        engine.begin(p, Tool::Highlighter, Point::ZERO, &brush, "p1");
        let stroke = engine.finish(p).unwrap();
        assert!((stroke.opacity - HIGHLIGHTER_OPACITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_discards() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Mouse;
        engine.begin(p, Tool::Pen, Point::ZERO, &brush, "p1");
        assert!(engine.cancel(p));
        assert!(engine.finish(p).is_none());
    }

    #[test]
    fn test_single_point_commits_as_dot() {
        let mut engine = CaptureEngine::new();
        let brush = Brush::default();
        let p = PointerId::Mouse;
        engine.begin(p, Tool::Pen, Point::new(4.0, 4.0), &brush, "p1");
        let stroke = engine.finish(p).unwrap();
        assert_eq!(stroke.points, vec![Point::new(4.0, 4.0)]);
    }
}
