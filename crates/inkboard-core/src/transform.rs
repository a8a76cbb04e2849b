//! Move/resize engine and the 8-handle selection box.

use crate::bounds::{stroke_bounds, Bounds, TEXT_LINE_HEIGHT};
use crate::stroke::Stroke;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Padding between a stroke's bounds and its selection box.
pub const HANDLE_PADDING: f64 = 10.0;
/// Minimum selection-box width/height while dragging a handle.
pub const MIN_BOX_SIZE: f64 = 20.0;
/// Minimum stroke width/height accepted by `resize_stroke`.
pub const MIN_STROKE_SIZE: f64 = 10.0;
/// Floor for text font size under height-driven resize.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Edge midpoint positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the 8 resize handles on a selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    Corner(Corner),
    Edge(Edge),
}

/// The selection box drawn around a stroke: its bounds plus handle padding.
pub fn selection_box(stroke: &Stroke) -> Bounds {
    stroke_bounds(stroke).inflate(HANDLE_PADDING)
}

/// Handle positions for a selection box: 4 corners and 4 edge midpoints.
pub fn handle_positions(sel_box: Bounds) -> [(Handle, Point); 8] {
    let (x0, y0) = (sel_box.x, sel_box.y);
    let (x1, y1) = (sel_box.x + sel_box.width, sel_box.y + sel_box.height);
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    [
        (Handle::Corner(Corner::TopLeft), Point::new(x0, y0)),
        (Handle::Edge(Edge::Top), Point::new(cx, y0)),
        (Handle::Corner(Corner::TopRight), Point::new(x1, y0)),
        (Handle::Edge(Edge::Right), Point::new(x1, cy)),
        (Handle::Corner(Corner::BottomRight), Point::new(x1, y1)),
        (Handle::Edge(Edge::Bottom), Point::new(cx, y1)),
        (Handle::Corner(Corner::BottomLeft), Point::new(x0, y1)),
        (Handle::Edge(Edge::Left), Point::new(x0, cy)),
    ]
}

/// Recompute a selection box after dragging one handle to `cursor`.
///
/// Only the edge(s) touched by the handle move; the opposite edge/corner is
/// held fixed. Width and height are clamped to `MIN_BOX_SIZE` so a drag can
/// never invert or collapse the box.
pub fn resize_box(handle: Handle, b: Bounds, cursor: Point) -> Bounds {
    let right = b.x + b.width;
    let bottom = b.y + b.height;
    let mut next = match handle {
        Handle::Corner(Corner::TopLeft) => {
            Bounds::new(cursor.x, cursor.y, right - cursor.x, bottom - cursor.y)
        }
        Handle::Edge(Edge::Top) => Bounds::new(b.x, cursor.y, b.width, bottom - cursor.y),
        Handle::Corner(Corner::TopRight) => {
            Bounds::new(b.x, cursor.y, cursor.x - b.x, bottom - cursor.y)
        }
        Handle::Edge(Edge::Right) => Bounds::new(b.x, b.y, cursor.x - b.x, b.height),
        Handle::Corner(Corner::BottomRight) => {
            Bounds::new(b.x, b.y, cursor.x - b.x, cursor.y - b.y)
        }
        Handle::Edge(Edge::Bottom) => Bounds::new(b.x, b.y, b.width, cursor.y - b.y),
        Handle::Corner(Corner::BottomLeft) => {
            Bounds::new(cursor.x, b.y, right - cursor.x, cursor.y - b.y)
        }
        Handle::Edge(Edge::Left) => Bounds::new(cursor.x, b.y, right - cursor.x, b.height),
    };
    next.width = next.width.max(MIN_BOX_SIZE);
    next.height = next.height.max(MIN_BOX_SIZE);
    next
}

/// Convert a dragged selection box back to target stroke bounds by
/// stripping the handle padding.
pub fn strip_padding(sel_box: Bounds) -> Bounds {
    Bounds::new(
        sel_box.x + HANDLE_PADDING,
        sel_box.y + HANDLE_PADDING,
        sel_box.width - HANDLE_PADDING * 2.0,
        sel_box.height - HANDLE_PADDING * 2.0,
    )
}

/// Full handle-drag pipeline: selection box → dragged box → target bounds.
pub fn drag_handle(stroke: &Stroke, handle: Handle, cursor: Point) -> Bounds {
    strip_padding(resize_box(handle, selection_box(stroke), cursor))
}

/// Translate every point of a stroke by (dx, dy).
pub fn move_stroke(stroke: &mut Stroke, dx: f64, dy: f64) {
    for p in &mut stroke.points {
        p.x += dx;
        p.y += dy;
    }
}

/// Resize a stroke to fit `new_bounds`.
///
/// Shape strokes map both endpoints with independent x/y scale factors so
/// the anchor's relative corner survives non-uniform scaling. Text strokes
/// scale only their font size, driven by the height change. Freehand strokes
/// remap every point in the cloud. Requested extents below
/// `MIN_STROKE_SIZE` are clamped, never rejected.
pub fn resize_stroke(stroke: &mut Stroke, new_bounds: Bounds) {
    let safe_w = new_bounds.width.max(MIN_STROKE_SIZE);
    let safe_h = new_bounds.height.max(MIN_STROKE_SIZE);

    if let Some((start, end)) = stroke.shape_endpoints() {
        let min_x = start.x.min(end.x);
        let min_y = start.y.min(end.y);
        // A degenerate source extent would divide by zero; treat it as 1.
        let old_w = (start.x - end.x).abs().max(1.0);
        let old_h = (start.y - end.y).abs().max(1.0);
        let scale_x = safe_w / old_w;
        let scale_y = safe_h / old_h;
        stroke.points = vec![
            Point::new(
                new_bounds.x + (start.x - min_x) * scale_x,
                new_bounds.y + (start.y - min_y) * scale_y,
            ),
            Point::new(
                new_bounds.x + (end.x - min_x) * scale_x,
                new_bounds.y + (end.y - min_y) * scale_y,
            ),
        ];
        return;
    }

    if stroke.is_text() {
        if stroke.points.is_empty() {
            return;
        }
        let font_size = stroke.effective_font_size();
        let old_h = font_size * TEXT_LINE_HEIGHT;
        let scale = safe_h / old_h;
        stroke.font_size = Some((font_size * scale).round().max(MIN_FONT_SIZE));
        stroke.points = vec![new_bounds.origin()];
        return;
    }

    if stroke.points.is_empty() {
        return;
    }

    let old = stroke_bounds(stroke);
    let old_w = old.width.max(1.0);
    let old_h = old.height.max(1.0);
    let scale_x = safe_w / old_w;
    let scale_y = safe_h / old_h;
    for p in &mut stroke.points {
        p.x = new_bounds.x + (p.x - old.x) * scale_x;
        p.y = new_bounds.y + (p.y - old.y) * scale_y;
    }
}
