//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed scale factor.
pub const MIN_SCALE: f64 = 0.25;
/// Maximum allowed scale factor.
pub const MAX_SCALE: f64 = 3.0;
/// Multiplicative step for one wheel notch.
pub const SCALE_STEP: f64 = 1.05;

/// Viewport manages the view transform for the board.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and scene coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current scale factor (1.0 = 100%)
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

/// An in-progress two-pointer pinch gesture.
///
/// The scene-space anchor is captured once when the gesture starts and kept
/// pinned under the moving midpoint for the rest of the gesture, so the
/// content never drifts while the fingers travel.
#[derive(Debug, Clone)]
pub struct Pinch {
    initial_distance: f64,
    initial_scale: f64,
    anchor_scene: Point,
}

impl Viewport {
    /// Create a new viewport at identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts scene coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to scene coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to scene coordinates.
    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a scene point to screen coordinates.
    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let scene_point = self.screen_to_scene(screen_point);
        self.scale = new_scale;

        // Adjust offset so scene_point stays at screen_point
        let new_screen = self.scene_to_screen(scene_point);
        self.offset += Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
    }

    /// Apply one wheel notch at the cursor. Positive `delta` zooms out,
    /// negative zooms in, matching wheel deltaY conventions.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta: f64) {
        let factor = if delta > 0.0 {
            1.0 / SCALE_STEP
        } else {
            SCALE_STEP
        };
        self.zoom_at(screen_point, factor);
    }

    /// Begin a pinch gesture from two screen touch points.
    ///
    /// Returns `None` when the touches coincide, since a zero baseline
    /// distance cannot produce a scale ratio.
    pub fn begin_pinch(&self, a: Point, b: Point) -> Option<Pinch> {
        let distance = a.distance(b);
        if distance < f64::EPSILON {
            return None;
        }
        let midpoint = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        Some(Pinch {
            initial_distance: distance,
            initial_scale: self.scale,
            anchor_scene: self.screen_to_scene(midpoint),
        })
    }

    /// Update the viewport for the current pinch touch positions.
    pub fn update_pinch(&mut self, pinch: &Pinch, a: Point, b: Point) {
        let distance = a.distance(b);
        if distance < f64::EPSILON {
            return;
        }
        let midpoint = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        self.scale = (pinch.initial_scale * distance / pinch.initial_distance)
            .clamp(MIN_SCALE, MAX_SCALE);
        // Pin the captured anchor under the current midpoint.
        self.offset = Vec2::new(
            midpoint.x - pinch.anchor_scene.x * self.scale,
            midpoint.y - pinch.anchor_scene.y * self.scale,
        );
    }

    /// Reset the viewport to identity.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Current zoom as a UI percentage.
    pub fn zoom_percentage(&self) -> f64 {
        self.scale * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_scene_identity() {
        let viewport = Viewport::new();
        let screen = Point::new(100.0, 200.0);
        let scene = viewport.screen_to_scene(screen);
        assert!((scene.x - screen.x).abs() < f64::EPSILON);
        assert!((scene.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_scene_with_offset_and_scale() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(50.0, 100.0);
        viewport.scale = 2.0;
        let scene = viewport.screen_to_scene(Point::new(150.0, 300.0));
        assert!((scene.x - 50.0).abs() < f64::EPSILON);
        assert!((scene.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.scale = 1.5;

        let original = Point::new(123.0, 456.0);
        let scene = viewport.screen_to_scene(original);
        let back = viewport.scene_to_screen(scene);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.scale - MIN_SCALE).abs() < f64::EPSILON);

        viewport.scale = 1.0;
        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.scale - MAX_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_keeps_cursor_fixed() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(12.0, 34.0);
        let cursor = Point::new(300.0, 200.0);
        let scene_before = viewport.screen_to_scene(cursor);
        viewport.zoom_at(cursor, 1.4);
        let scene_after = viewport.screen_to_scene(cursor);
        assert!((scene_after.x - scene_before.x).abs() < 1e-10);
        assert!((scene_after.y - scene_before.y).abs() < 1e-10);
    }

    #[test]
    fn test_wheel_zoom_direction() {
        let mut viewport = Viewport::new();
        viewport.wheel_zoom(Point::ZERO, -1.0);
        assert!((viewport.scale - SCALE_STEP).abs() < f64::EPSILON);
        viewport.wheel_zoom(Point::ZERO, 1.0);
        assert!((viewport.scale - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((viewport.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pinch_zero_distance_rejected() {
        let viewport = Viewport::new();
        let p = Point::new(100.0, 100.0);
        assert!(viewport.begin_pinch(p, p).is_none());
    }

    #[test]
    fn test_pinch_scales_by_distance_ratio() {
        let mut viewport = Viewport::new();
        let pinch = viewport
            .begin_pinch(Point::new(100.0, 200.0), Point::new(200.0, 200.0))
            .unwrap();
        viewport.update_pinch(&pinch, Point::new(50.0, 200.0), Point::new(250.0, 200.0));
        assert!((viewport.scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pinch_anchor_stays_under_midpoint() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(-40.0, 15.0);
        viewport.scale = 1.2;
        let a = Point::new(100.0, 100.0);
        let b = Point::new(300.0, 100.0);
        let pinch = viewport.begin_pinch(a, b).unwrap();
        let anchor = viewport.screen_to_scene(Point::new(200.0, 100.0));

        // Fingers spread and drift.
        let a2 = Point::new(80.0, 140.0);
        let b2 = Point::new(340.0, 140.0);
        viewport.update_pinch(&pinch, a2, b2);
        let midpoint = Point::new(210.0, 140.0);
        let under_midpoint = viewport.screen_to_scene(midpoint);
        assert!((under_midpoint.x - anchor.x).abs() < 1e-9);
        assert!((under_midpoint.y - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_clamps_scale() {
        let mut viewport = Viewport::new();
        let pinch = viewport
            .begin_pinch(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .unwrap();
        viewport.update_pinch(&pinch, Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        assert!((viewport.scale - MAX_SCALE).abs() < f64::EPSILON);
    }
}
