//! Compiled, absolutely positioned drawable primitives.
//!
//! A [`GraphicsTree`] is what a rendering surface consumes. It carries no
//! reference back to the metadata it came from; see [`crate::scene`] for the
//! id-based lookup.

use crate::color::SerializableColor;
use crate::style::{Border, FontSpec, TextAlign, VerticalAlign};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// What part of an element a primitive draws. Lets tests and renderers
/// pick out e.g. the header band or the first body line without relying on
/// primitive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Outer background and border.
    #[default]
    Frame,
    /// Title or header band.
    Header,
    /// Weekday names, time labels and other captions.
    Label,
    /// Body content: day cells, table cells, ruled lines.
    Body,
    /// Grid lines.
    Grid,
    /// Holiday markers and check marks.
    Marker,
    /// User content such as cell text or images.
    Content,
}

/// A single drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    #[serde(rename_all = "camelCase")]
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<SerializableColor>,
        stroke: Option<Border>,
        #[serde(default)]
        corner_radius: f64,
        #[serde(default)]
        role: Role,
    },
    /// A text run laid out inside a box.
    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        content: String,
        font: FontSpec,
        #[serde(default)]
        align: TextAlign,
        #[serde(default)]
        valign: VerticalAlign,
        #[serde(default)]
        role: Role,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Border,
        #[serde(default)]
        role: Role,
    },
    Path {
        path: BezPath,
        fill: Option<SerializableColor>,
        stroke: Option<Border>,
        #[serde(default)]
        role: Role,
    },
    /// Image placeholder. `source` is an opaque reference resolved by the
    /// rendering surface.
    #[serde(rename_all = "camelCase")]
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        source: Option<String>,
        #[serde(default)]
        corner_radius: f64,
        #[serde(default)]
        role: Role,
    },
}

impl Primitive {
    pub fn rect(
        rect: Rect,
        fill: Option<SerializableColor>,
        stroke: Option<Border>,
        role: Role,
    ) -> Self {
        Primitive::Rect {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            fill,
            stroke: stroke.filter(Border::is_visible),
            corner_radius: 0.0,
            role,
        }
    }

    pub fn text(
        rect: Rect,
        content: impl Into<String>,
        font: &FontSpec,
        align: TextAlign,
        valign: VerticalAlign,
        role: Role,
    ) -> Self {
        Primitive::Text {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            content: content.into(),
            font: font.clone(),
            align,
            valign,
            role,
        }
    }

    pub fn line(from: Point, to: Point, stroke: Border, role: Role) -> Self {
        Primitive::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            stroke,
            role,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Primitive::Rect { role, .. }
            | Primitive::Text { role, .. }
            | Primitive::Line { role, .. }
            | Primitive::Path { role, .. }
            | Primitive::Image { role, .. } => *role,
        }
    }

    /// Axis-aligned bounds, ignoring stroke width.
    pub fn bounds(&self) -> Rect {
        match self {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                ..
            }
            | Primitive::Text {
                x,
                y,
                width,
                height,
                ..
            }
            | Primitive::Image {
                x,
                y,
                width,
                height,
                ..
            } => Rect::new(*x, *y, x + width, y + height),
            Primitive::Line { x1, y1, x2, y2, .. } => {
                Rect::from_points(Point::new(*x1, *y1), Point::new(*x2, *y2))
            }
            Primitive::Path { path, .. } => path.bounding_box(),
        }
    }

    /// Top edge, used for vertical ordering checks.
    pub fn top(&self) -> f64 {
        self.bounds().y0
    }

    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Primitive::Rect { x, y, .. }
            | Primitive::Text { x, y, .. }
            | Primitive::Image { x, y, .. } => {
                *x += offset.x;
                *y += offset.y;
            }
            Primitive::Line { x1, y1, x2, y2, .. } => {
                *x1 += offset.x;
                *y1 += offset.y;
                *x2 += offset.x;
                *y2 += offset.y;
            }
            Primitive::Path { path, .. } => path.apply_affine(Affine::translate(offset)),
        }
    }

    /// Text content, for text runs.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Primitive::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Ordered list of primitives; later primitives paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicsTree {
    pub primitives: Vec<Primitive>,
}

impl GraphicsTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, other: GraphicsTree) {
        self.primitives.extend(other.primitives);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    /// Primitives with the given role, in paint order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.role() == role)
    }

    /// Shift every primitive by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        for primitive in &mut self.primitives {
            primitive.translate(offset);
        }
    }

    pub fn translated(mut self, offset: Vec2) -> Self {
        self.translate(offset);
        self
    }

    /// Union of primitive bounds, `None` for an empty tree.
    pub fn bounds(&self) -> Option<Rect> {
        self.primitives
            .iter()
            .map(Primitive::bounds)
            .reduce(|acc, r| acc.union(r))
    }
}

impl<'a> IntoIterator for &'a GraphicsTree {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_drops_invisible_stroke() {
        let p = Primitive::rect(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            None,
            Some(Border::none()),
            Role::Frame,
        );
        let Primitive::Rect { stroke, .. } = p else {
            panic!("expected rect");
        };
        assert!(stroke.is_none());
    }

    #[test]
    fn test_translate_and_bounds() {
        let mut tree = GraphicsTree::new();
        tree.push(Primitive::rect(
            Rect::new(0.0, 0.0, 10.0, 20.0),
            Some(SerializableColor::white()),
            None,
            Role::Frame,
        ));
        tree.push(Primitive::line(
            Point::new(5.0, 5.0),
            Point::new(30.0, 5.0),
            Border::default(),
            Role::Grid,
        ));
        tree.translate(Vec2::new(100.0, 50.0));
        assert_eq!(tree.bounds(), Some(Rect::new(100.0, 50.0, 130.0, 70.0)));
        assert_eq!(tree.with_role(Role::Grid).count(), 1);
    }

    #[test]
    fn test_json_tagging() {
        let p = Primitive::text(
            Rect::new(0.0, 0.0, 50.0, 20.0),
            "Mon",
            &FontSpec::default(),
            TextAlign::Center,
            VerticalAlign::Middle,
            Role::Label,
        );
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "Mon");
        let back: Primitive = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_empty_tree_has_no_bounds() {
        assert!(GraphicsTree::new().bounds().is_none());
    }
}
