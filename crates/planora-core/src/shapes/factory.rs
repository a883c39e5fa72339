//! Shape factory: builds any [`ShapeKind`] with a generated id, a default
//! name and kind-specific geometry, overridden field by field by
//! [`ShapeOptions`].

use super::{Arrow, ArrowHead, Ellipse, Line, LineCap, Rectangle, Shape, ShapeKind, Triangle};
use crate::color::SerializableColor;
use crate::style::StrokeStyle;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

const RECT_SIZE: f64 = 100.0;
const CIRCLE_RADIUS: f64 = 50.0;
const ELLIPSE_RX: f64 = 60.0;
const ELLIPSE_RY: f64 = 40.0;
const TRIANGLE_WIDTH: f64 = 100.0;
const TRIANGLE_HEIGHT: f64 = 87.0;
const CONNECTOR_LENGTH: f64 = 200.0;

/// Optional overrides. Every `Some` field replaces just that default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeOptions {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Placement of the shape's local origin on the canvas.
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub corner_radius: Option<f64>,
    /// Connector length along the x axis when no end point is given.
    pub length: Option<f64>,
    /// Explicit connector end point, relative to the start.
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub stroke_color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub stroke_style: Option<StrokeStyle>,
    /// A transparent colour removes the fill.
    pub fill_color: Option<SerializableColor>,
    pub line_cap: Option<LineCap>,
    pub start_head: Option<ArrowHead>,
    pub end_head: Option<ArrowHead>,
    pub head_size: Option<f64>,
}

/// A freshly built shape, ready to become a canvas object.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub id: String,
    pub name: String,
    pub position: Point,
    pub shape: Shape,
}

impl ShapeDraft {
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Local bounds of the geometry.
    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }
}

/// Build a shape of `kind`.
pub fn create(kind: ShapeKind, options: &ShapeOptions) -> ShapeDraft {
    let positive = |v: Option<f64>, fallback: f64| match v {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!("ignoring invalid {} dimension {v}", kind.as_str());
            fallback
        }
        None => fallback,
    };

    let mut shape = match kind {
        ShapeKind::Rectangle => {
            let mut rect = Rectangle::new(
                Point::ZERO,
                positive(options.width, RECT_SIZE),
                positive(options.height, RECT_SIZE),
            );
            if let Some(radius) = options.corner_radius.filter(|r| r.is_finite()) {
                rect.corner_radius = radius.max(0.0);
            }
            Shape::Rectangle(rect)
        }
        ShapeKind::Circle => {
            let r = positive(options.radius, CIRCLE_RADIUS);
            Shape::Circle(Ellipse::circle(Point::new(r, r), r))
        }
        ShapeKind::Ellipse => {
            let rx = positive(options.rx, ELLIPSE_RX);
            let ry = positive(options.ry, ELLIPSE_RY);
            Shape::Ellipse(Ellipse::new(Point::new(rx, ry), rx, ry))
        }
        ShapeKind::Triangle => Shape::Triangle(Triangle::new(
            Point::ZERO,
            positive(options.width, TRIANGLE_WIDTH),
            positive(options.height, TRIANGLE_HEIGHT),
        )),
        ShapeKind::Line => {
            let mut line = Line::new(Point::ZERO, connector_end(options));
            if let Some(cap) = options.line_cap {
                line.cap = cap;
            }
            Shape::Line(line)
        }
        ShapeKind::Arrow => {
            let mut arrow = Arrow::new(Point::ZERO, connector_end(options));
            arrow.head_size = positive(options.head_size, Arrow::DEFAULT_HEAD_SIZE);
            if let Some(cap) = options.line_cap {
                arrow.cap = cap;
            }
            if let Some(head) = options.start_head {
                arrow.start_head = head;
            }
            if let Some(head) = options.end_head {
                arrow.end_head = head;
            }
            Shape::Arrow(arrow)
        }
    };

    let style = shape.style_mut();
    if let Some(color) = options.stroke_color {
        style.stroke_color = color;
    }
    if let Some(width) = options.stroke_width.filter(|w| w.is_finite() && *w >= 0.0) {
        style.stroke_width = width;
    }
    if let Some(stroke_style) = options.stroke_style {
        style.stroke_style = stroke_style;
    }
    if let Some(fill) = options.fill_color {
        style.fill_color = Some(fill).filter(|c| !c.is_transparent());
    }

    ShapeDraft {
        id: options.id.clone().unwrap_or_else(|| generate_id(kind)),
        name: options
            .name
            .clone()
            .unwrap_or_else(|| kind.display_name().to_string()),
        position: Point::new(
            options.left.filter(|v| v.is_finite()).unwrap_or(0.0),
            options.top.filter(|v| v.is_finite()).unwrap_or(0.0),
        ),
        shape,
    }
}

/// End point of a line or arrow: explicit coordinates when both are given,
/// otherwise `length`, then `width`, along the x axis.
fn connector_end(options: &ShapeOptions) -> Point {
    if let (Some(x), Some(y)) = (options.x2, options.y2) {
        if x.is_finite() && y.is_finite() {
            return Point::new(x, y);
        }
    }
    let length = options
        .length
        .or(options.width)
        .filter(|v| v.is_finite())
        .unwrap_or(CONNECTOR_LENGTH);
    Point::new(length, 0.0)
}

/// Unique id of the form `"{kind}-{timestamp_ms}-{random}"`.
pub fn generate_id(kind: ShapeKind) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", kind.as_str(), timestamp, &random[..9])
}
