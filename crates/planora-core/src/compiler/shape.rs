//! Local graphics for non-element objects: shapes, text boxes and images.

use super::compile;
use crate::color::SerializableColor;
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::holiday::HolidayLookup;
use crate::object::{CanvasObject, ObjectProperties};
use crate::style::Border;
use kurbo::Rect;

const PLACEHOLDER_FILL: SerializableColor = SerializableColor::rgb(0xf3, 0xf4, 0xf6);

/// Compile an object's payload in object-local coordinates.
pub(super) fn compile_properties<H: HolidayLookup + ?Sized>(object: &CanvasObject, holidays: &H) -> GraphicsTree {
    let mut tree = GraphicsTree::new();
    let local = Rect::new(0.0, 0.0, object.width.max(0.0), object.height.max(0.0));
    match &object.properties {
        ObjectProperties::Element { metadata } => return compile(metadata, holidays),
        ObjectProperties::Shape { shape } => {
            let style = shape.style();
            tree.push(Primitive::Path {
                path: shape.to_path(),
                fill: style.fill_color,
                stroke: Some(style.border()).filter(Border::is_visible),
                role: Role::Content,
            });
        }
        ObjectProperties::Text(text) => {
            if let Some(background) = text.background.filter(|c| !c.is_transparent()) {
                tree.push(Primitive::rect(local, Some(background), None, Role::Frame));
            }
            tree.push(Primitive::text(
                local,
                text.text.clone(),
                &text.font,
                text.align,
                text.valign,
                Role::Content,
            ));
        }
        ObjectProperties::Image(image) => {
            if image.source.is_none() {
                tree.push(Primitive::rect(local, Some(PLACEHOLDER_FILL), Some(Border::default()), Role::Frame));
            }
            tree.push(Primitive::Image {
                x: 0.0,
                y: 0.0,
                width: local.width(),
                height: local.height(),
                source: image.source.clone(),
                corner_radius: image.corner_radius.max(0.0),
                role: Role::Content,
            });
        }
        ObjectProperties::Group { .. } => {}
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::super::compile_object;
    use super::*;
    use crate::holiday::NoHolidays;
    use crate::metadata::TableMetadata;
    use crate::object::{ImageProperties, TextProperties};
    use crate::shapes::{ShapeKind, ShapeOptions, create};
    use kurbo::Point;

    #[test]
    fn test_shape_compiles_to_one_path() {
        let draft = create(
            ShapeKind::Rectangle,
            &ShapeOptions {
                left: Some(50.0),
                top: Some(60.0),
                ..ShapeOptions::default()
            },
        );
        let obj = CanvasObject::from_shape(draft);
        let tree = compile_object(&obj, &NoHolidays);
        assert_eq!(tree.len(), 1);
        let bounds = tree.bounds().unwrap();
        assert!((bounds.x0 - 50.0).abs() < 1e-9);
        assert!((bounds.y0 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_object_is_placed() {
        let obj = CanvasObject::element(TableMetadata::default().into(), Point::new(100.0, 40.0));
        let tree = compile_object(&obj, &NoHolidays);
        let bounds = tree.bounds().unwrap();
        assert!((bounds.x0 - 100.0).abs() < 1e-9);
        assert!((bounds.y0 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_and_image() {
        let text = CanvasObject::text(
            TextProperties {
                text: "Hello".into(),
                ..TextProperties::default()
            },
            Rect::new(0.0, 0.0, 80.0, 20.0),
        );
        let tree = compile_object(&text, &NoHolidays);
        assert_eq!(tree.iter().filter_map(Primitive::text_content).collect::<Vec<_>>(), ["Hello"]);

        let placeholder = CanvasObject::image(ImageProperties::default(), Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(compile_object(&placeholder, &NoHolidays).len(), 2);
    }

    #[test]
    fn test_group_is_empty() {
        let group = CanvasObject::group(Vec::new(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(compile_object(&group, &NoHolidays).is_empty());
    }
}
