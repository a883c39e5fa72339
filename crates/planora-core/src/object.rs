//! Placed canvas objects.
//!
//! A [`CanvasObject`] owns its placement (`x`, `y`, size, rotation) and a
//! [`ObjectProperties`] payload. Its [`ObjectId`] is generated once and is
//! the join key between compiled graphics and the metadata store.

use crate::color::SerializableColor;
use crate::metadata::{ElementKind, ElementMetadata};
use crate::shapes::{Shape, ShapeDraft, ShapeKind};
use crate::style::{FontSpec, TextAlign, VerticalAlign};
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a canvas object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Free text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProperties {
    pub text: String,
    pub font: FontSpec,
    pub align: TextAlign,
    pub valign: VerticalAlign,
    pub background: Option<SerializableColor>,
}

impl Default for TextProperties {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontSpec::default(),
            align: TextAlign::Left,
            valign: VerticalAlign::Top,
            background: None,
        }
    }
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

/// Image or photo placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProperties {
    /// Opaque reference resolved by the rendering surface. `None` draws a
    /// placeholder.
    pub source: Option<String>,
    pub fit: ImageFit,
    pub corner_radius: f64,
}

/// What an object is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ObjectProperties {
    Element { metadata: ElementMetadata },
    Shape { shape: Shape },
    Text(TextProperties),
    Image(ImageProperties),
    /// Children are separate objects; the group only records membership.
    Group { children: Vec<ObjectId> },
}

/// Coarse object type, for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Element(ElementKind),
    Shape(ShapeKind),
    Text,
    Image,
    Group,
}

/// A placed element, shape, text box, image or group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the object's center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Non-selectable objects are decoration (e.g. background artwork).
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default)]
    pub z_index: usize,
    pub properties: ObjectProperties,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl CanvasObject {
    fn with_properties(name: impl Into<String>, bounds: Rect, properties: ObjectProperties) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            selectable: true,
            z_index: 0,
            properties,
        }
    }

    /// Place an element at `position`; its size comes from the metadata.
    pub fn element(metadata: ElementMetadata, position: Point) -> Self {
        let bounds = Rect::from_origin_size(position, metadata.size());
        let name = metadata.kind().display_name();
        Self::with_properties(name, bounds, ObjectProperties::Element { metadata })
    }

    /// Turn a factory shape into an object. The geometry is normalised so
    /// its local bounds start at the origin.
    pub fn from_shape(draft: ShapeDraft) -> Self {
        let ShapeDraft {
            id,
            name,
            position,
            mut shape,
        } = draft;
        let local = shape.bounds();
        shape.transform(Affine::translate(-local.origin().to_vec2()));
        let bounds = Rect::from_origin_size(position + local.origin().to_vec2(), local.size());
        Self {
            id: ObjectId::from(id),
            ..Self::with_properties(name, bounds, ObjectProperties::Shape { shape })
        }
    }

    pub fn text(text: TextProperties, bounds: Rect) -> Self {
        Self::with_properties("Text", bounds, ObjectProperties::Text(text))
    }

    pub fn image(image: ImageProperties, bounds: Rect) -> Self {
        Self::with_properties("Image", bounds, ObjectProperties::Image(image))
    }

    pub fn group(children: Vec<ObjectId>, bounds: Rect) -> Self {
        Self::with_properties("Group", bounds, ObjectProperties::Group { children })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn object_type(&self) -> ObjectType {
        match &self.properties {
            ObjectProperties::Element { metadata } => ObjectType::Element(metadata.kind()),
            ObjectProperties::Shape { shape } => ObjectType::Shape(shape.kind()),
            ObjectProperties::Text(_) => ObjectType::Text,
            ObjectProperties::Image(_) => ObjectType::Image,
            ObjectProperties::Group { .. } => ObjectType::Group,
        }
    }

    /// Unrotated bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Axis-aligned bounds after rotation, the box a selection frame shows.
    pub fn aabb(&self) -> Rect {
        let bounds = self.bounds();
        if self.rotation == 0.0 || !self.rotation.is_finite() {
            return bounds;
        }
        let rotate = Affine::rotate_about(self.rotation.to_radians(), bounds.center());
        (rotate * bounds.to_path(0.1)).bounding_box()
    }

    pub fn metadata(&self) -> Option<&ElementMetadata> {
        match &self.properties {
            ObjectProperties::Element { metadata } => Some(metadata),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        self.metadata().is_some_and(ElementMetadata::is_table)
    }

    pub fn children(&self) -> &[ObjectId] {
        match &self.properties {
            ObjectProperties::Group { children } => children,
            _ => &[],
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Resize in place, keeping derived geometry consistent: element
    /// metadata gets the new size and shapes are rescaled.
    pub(crate) fn set_size(&mut self, size: Size) {
        match &mut self.properties {
            ObjectProperties::Element { metadata } => *metadata = metadata.with_size(size),
            ObjectProperties::Shape { shape } => shape.fit_to(size.width, size.height),
            _ => {}
        }
        self.width = size.width;
        self.height = size.height;
    }

    /// Re-read width and height from element metadata after it changed.
    pub(crate) fn sync_size_from_metadata(&mut self) {
        if let Some(size) = self.metadata().map(ElementMetadata::size) {
            self.width = size.width;
            self.height = size.height;
        }
    }
}
