//! Plain drawable shapes: rectangles, ellipses, circles, triangles, lines
//! and arrows.
//!
//! Shape geometry is stored in object-local coordinates; the owning
//! [`CanvasObject`](crate::object::CanvasObject) supplies the placement.

mod arrow;
mod ellipse;
mod factory;
mod line;
mod rectangle;
mod triangle;

pub use arrow::{Arrow, ArrowHead};
pub use ellipse::Ellipse;
pub use factory::{ShapeDraft, ShapeOptions, create, generate_id};
pub use line::{Line, LineCap};
pub use rectangle::Rectangle;
pub use triangle::Triangle;

use crate::color::SerializableColor;
use crate::style::{Border, StrokeStyle};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Kinds the shape factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Arrow,
}

impl ShapeKind {
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Triangle,
            ShapeKind::Line,
            ShapeKind::Arrow,
        ]
    }

    /// Lowercase name, used in generated ids.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
        }
    }

    /// Default human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }

    /// Whether this kind is a connector (no fill, end caps).
    pub fn is_connector(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }

    /// Shared default style for this kind.
    pub fn default_style(self) -> ShapeStyle {
        DEFAULT_STYLES[self as usize]
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Solid, dashed or dotted outline.
    pub stroke_style: StrokeStyle,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        DEFAULT_STYLES[ShapeKind::Rectangle as usize]
    }
}

impl ShapeStyle {
    const fn new(stroke_color: SerializableColor, stroke_width: f64, fill_color: Option<SerializableColor>) -> Self {
        Self {
            stroke_color,
            stroke_width,
            fill_color,
            stroke_style: StrokeStyle::Solid,
        }
    }

    /// Outline as a border value for compiled primitives.
    pub fn border(&self) -> Border {
        Border {
            color: self.stroke_color,
            width: self.stroke_width,
            style: self.stroke_style,
        }
    }
}

const INK: SerializableColor = SerializableColor::rgb(0x1f, 0x29, 0x37);
const BLUE: SerializableColor = SerializableColor::rgb(0x3b, 0x82, 0xf6);

/// One default style per [`ShapeKind`], indexed by discriminant.
static DEFAULT_STYLES: [ShapeStyle; 6] = [
    ShapeStyle::new(INK, 2.0, Some(SerializableColor::rgb(0xdb, 0xea, 0xfe))),
    ShapeStyle::new(INK, 2.0, Some(SerializableColor::rgb(0xfe, 0xf3, 0xc7))),
    ShapeStyle::new(INK, 2.0, Some(SerializableColor::rgb(0xdc, 0xfc, 0xe7))),
    ShapeStyle::new(INK, 2.0, Some(SerializableColor::rgb(0xfc, 0xe7, 0xf3))),
    ShapeStyle::new(INK, 2.0, None),
    ShapeStyle::new(BLUE, 2.0, None),
];

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Bounding box in object-local coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a local point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Path representation for rendering.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape's geometry.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Ellipse),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Line(Line),
    Arrow(Arrow),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
        }
    }

    fn inner(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) | Shape::Ellipse(s) => s,
            Shape::Triangle(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Circle(s) | Shape::Ellipse(s) => s,
            Shape::Triangle(s) => s,
            Shape::Line(s) => s,
            Shape::Arrow(s) => s,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    pub fn to_path(&self) -> BezPath {
        self.inner().to_path()
    }

    pub fn style(&self) -> &ShapeStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.inner_mut().style_mut()
    }

    pub fn transform(&mut self, affine: Affine) {
        self.inner_mut().transform(affine);
    }

    /// Scale the geometry so its bounds match `width` × `height`, keeping
    /// the top-left corner of the bounds in place.
    pub fn fit_to(&mut self, width: f64, height: f64) {
        let bounds = self.bounds();
        let sx = if bounds.width() > f64::EPSILON { width / bounds.width() } else { 1.0 };
        let sy = if bounds.height() > f64::EPSILON { height / bounds.height() } else { 1.0 };
        if !(sx.is_finite() && sy.is_finite()) {
            log::warn!("ignoring non-finite shape resize to {width}x{height}");
            return;
        }
        let origin = bounds.origin().to_vec2();
        self.transform(
            Affine::translate(origin) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-origin),
        );
    }

    /// Whether this shape is a line or arrow.
    pub fn is_connector(&self) -> bool {
        self.kind().is_connector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_table() {
        assert!(ShapeKind::Rectangle.default_style().fill_color.is_some());
        assert!(ShapeKind::Line.default_style().fill_color.is_none());
        assert!(ShapeKind::Arrow.default_style().fill_color.is_none());
        assert_eq!(ShapeStyle::default(), ShapeKind::Rectangle.default_style());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ShapeKind::parse("Arrow"), Some(ShapeKind::Arrow));
        assert_eq!(ShapeKind::parse("hexagon"), None);
    }

    #[test]
    fn test_fit_to_scales_bounds() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0));
        shape.fit_to(200.0, 25.0);
        let bounds = shape.bounds();
        assert!((bounds.x0 - 10.0).abs() < 1e-9);
        assert!((bounds.width() - 200.0).abs() < 1e-9);
        assert!((bounds.height() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_distance() {
        let d = point_to_segment_dist(Point::new(5.0, 5.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shape_json_tag() {
        let shape = Shape::Circle(Ellipse::circle(Point::new(50.0, 50.0), 50.0));
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["shape"], "circle");
        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }
}
