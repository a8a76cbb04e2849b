//! Stroke data model for the whiteboard.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Default stroke color (white ink on the default blue page).
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Neutral pointer/select tool.
    Select,
    /// Free-form polygon selection.
    Lasso,
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Triangle,
    Pentagon,
    Hexagon,
    Star,
    Text,
    Calligraphy,
}

impl Tool {
    /// Tools that produce a two-point rubber-band shape.
    pub fn is_shape(&self) -> bool {
        self.shape_kind().is_some()
    }

    /// Tools that accumulate a freehand point sequence.
    pub fn is_freehand(&self) -> bool {
        matches!(
            self,
            Tool::Pen | Tool::Highlighter | Tool::Eraser | Tool::Calligraphy
        )
    }

    /// The shape kind this tool draws, if any.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            Tool::Triangle => Some(ShapeKind::Triangle),
            Tool::Pentagon => Some(ShapeKind::Pentagon),
            Tool::Hexagon => Some(ShapeKind::Hexagon),
            Tool::Star => Some(ShapeKind::Star),
            _ => None,
        }
    }
}

/// Parametric shape kinds, stored on shape strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
    Triangle,
    Pentagon,
    Hexagon,
    Star,
}

/// Font weight for text strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font style for text strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Text decoration for text strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// One drawn or placed element: a freehand path, a parametric shape, or text.
///
/// Serialized camelCase to match the persisted page-content format.
/// Invariants: a committed stroke has at least one point; shape strokes have
/// exactly two points (anchor + opposite corner); text strokes have exactly
/// one point (top-left anchor).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: StrokeId,
    pub tool: Tool,
    pub points: Vec<Point>,
    /// CSS-style color string, e.g. "#ffffff".
    pub color: String,
    pub width: f64,
    pub opacity: f64,
    pub page_id: String,
    /// ISO-8601 creation timestamp, assigned by the host.
    pub created_at: String,
    /// Set for shape strokes (the tool alone also implies it; kept on the
    /// wire for compatibility with existing documents).
    #[serde(rename = "shapeType", skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

/// Default font size for text strokes when none is recorded.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

impl Stroke {
    /// True for text strokes (anchor point + content).
    pub fn is_text(&self) -> bool {
        self.tool == Tool::Text
    }

    /// True for two-point parametric shapes.
    pub fn is_shape(&self) -> bool {
        self.shape.is_some()
    }

    /// True for freehand point clouds (pen, highlighter, eraser, calligraphy).
    pub fn is_freehand(&self) -> bool {
        self.tool.is_freehand()
    }

    /// Effective font size for text strokes.
    pub fn effective_font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// The two conceptual endpoints of a shape stroke: the anchor and the
    /// opposite corner (first and last point).
    pub fn shape_endpoints(&self) -> Option<(Point, Point)> {
        if self.is_shape() && self.points.len() >= 2 {
            Some((self.points[0], self.points[self.points.len() - 1]))
        } else {
            None
        }
    }
}
