//! Photo collages.

use super::{frame, safe_size};
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::metadata::CollageMetadata;
use crate::style::Border;

pub(super) fn compile(meta: &CollageMetadata) -> GraphicsTree {
    let meta = CollageMetadata {
        size: safe_size(meta.size),
        ..meta.clone()
    };
    let mut tree = GraphicsTree::new();
    frame(&mut tree, meta.size, meta.background, Border::none());

    let radius = if meta.corner_radius.is_finite() {
        meta.corner_radius.max(0.0)
    } else {
        0.0
    };
    for (i, rect) in meta.slot_rects().into_iter().enumerate() {
        let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
        let mut slot = Primitive::rect(
            rect,
            Some(meta.slot_background),
            Some(meta.slot_border),
            Role::Body,
        );
        if let Primitive::Rect { corner_radius, .. } = &mut slot {
            *corner_radius = radius;
        }
        tree.push(slot);

        let source = meta.slots.get(i).and_then(|s| s.image.clone());
        if source.is_some() {
            tree.push(Primitive::Image {
                x: rect.x0,
                y: rect.y0,
                width: rect.width(),
                height: rect.height(),
                source,
                corner_radius: radius,
                role: Role::Content,
            });
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{CollageLayout, CollageSlot};

    #[test]
    fn test_slots_and_images() {
        let meta = CollageMetadata {
            layout: CollageLayout::Grid { rows: 1, columns: 3 },
            slots: vec![
                CollageSlot {
                    image: Some("photos/beach.jpg".into()),
                },
                CollageSlot::default(),
            ],
            ..CollageMetadata::default()
        };
        let tree = compile(&meta);
        assert_eq!(tree.with_role(Role::Body).count(), 3);
        let images: Vec<_> = tree
            .with_role(Role::Content)
            .filter_map(|p| match p {
                Primitive::Image { source, .. } => source.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(images, vec!["photos/beach.jpg".to_string()]);
    }

    #[test]
    fn test_corner_radius_clamped_to_slot() {
        let meta = CollageMetadata {
            corner_radius: 1000.0,
            ..CollageMetadata::default()
        };
        let tree = compile(&meta);
        for p in tree.with_role(Role::Body) {
            let Primitive::Rect { corner_radius, width, height, .. } = p else {
                panic!("expected rect");
            };
            assert!(*corner_radius <= width.min(*height) / 2.0 + 1e-9);
        }
    }
}
