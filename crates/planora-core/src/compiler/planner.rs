//! Planner blocks: notes, schedules and checklists.
//!
//! Body content is laid out from [`PlannerHeader::body_top`], so hiding the
//! header moves everything up to the header's inset instead of leaving a gap.

use super::{frame, safe_len, safe_size};
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::metadata::{
    ChecklistMetadata, PlannerHeader, PlannerNoteMetadata, PlannerStyle, ScheduleMetadata,
};
use crate::style::{Border, TextAlign, VerticalAlign};
use kurbo::{BezPath, Point, Rect, Size};

pub(super) fn compile_note(meta: &PlannerNoteMetadata) -> GraphicsTree {
    let size = safe_size(meta.size);
    let mut tree = GraphicsTree::new();
    let top = shell(&mut tree, size, &meta.header, &meta.style);
    let pad = padding(&meta.style, size);
    let bottom = (size.height - pad).max(top);

    if let Some(line_style) = meta.line_style {
        if meta.line_count > 0 {
            let stroke = Border {
                style: line_style,
                ..meta.style.line
            };
            let spacing = (bottom - top) / meta.line_count as f64;
            for i in 1..=meta.line_count {
                let y = top + spacing * i as f64;
                tree.push(Primitive::line(
                    Point::new(pad, y),
                    Point::new(size.width - pad, y),
                    stroke,
                    Role::Body,
                ));
            }
        }
    }

    if !meta.text.is_empty() {
        tree.push(Primitive::text(
            Rect::new(pad, top, size.width - pad, bottom),
            meta.text.clone(),
            &meta.style.body_font,
            TextAlign::Left,
            VerticalAlign::Top,
            Role::Content,
        ));
    }
    tree
}

pub(super) fn compile_schedule(meta: &ScheduleMetadata) -> GraphicsTree {
    let size = safe_size(meta.size);
    let mut tree = GraphicsTree::new();
    let top = shell(&mut tree, size, &meta.header, &meta.style);
    let pad = padding(&meta.style, size);

    let slots = meta.slot_count();
    let row_h = (size.height - top).max(0.0) / slots as f64;
    let label_w = if meta.show_time_labels {
        safe_len(meta.time_label_width, 0.0).min(size.width)
    } else {
        0.0
    };

    for slot in 0..slots {
        let y = top + row_h * slot as f64;
        tree.push(Primitive::line(
            Point::new(0.0, y),
            Point::new(size.width, y),
            meta.style.line,
            Role::Body,
        ));
        if meta.show_time_labels {
            tree.push(Primitive::text(
                Rect::new(pad.min(label_w), y, (label_w - pad).max(0.0), y + row_h),
                meta.slot_label(slot),
                &meta.style.body_font,
                TextAlign::Left,
                VerticalAlign::Top,
                Role::Label,
            ));
        }
    }

    if meta.show_time_labels && label_w > 0.0 {
        tree.push(Primitive::line(
            Point::new(label_w, top),
            Point::new(label_w, size.height.max(top)),
            meta.style.line,
            Role::Grid,
        ));
    }

    for entry in &meta.entries {
        if entry.slot >= slots {
            log::warn!("schedule entry for slot {} past the last slot {}", entry.slot, slots - 1);
            continue;
        }
        let y = top + row_h * entry.slot as f64;
        let x0 = (label_w + pad).min(size.width);
        tree.push(Primitive::text(
            Rect::new(x0, y, (size.width - pad).max(x0), y + row_h),
            entry.text.clone(),
            &meta.style.body_font,
            TextAlign::Left,
            VerticalAlign::Middle,
            Role::Content,
        ));
    }
    tree
}

pub(super) fn compile_checklist(meta: &ChecklistMetadata) -> GraphicsTree {
    let size = safe_size(meta.size);
    let mut tree = GraphicsTree::new();
    let top = shell(&mut tree, size, &meta.header, &meta.style);
    let pad = padding(&meta.style, size);

    let defaults = ChecklistMetadata::default();
    let row_h = match safe_len(meta.row_height, defaults.row_height) {
        h if h > 0.0 => h,
        _ => defaults.row_height,
    };
    let box_size = safe_len(meta.checkbox_size, defaults.checkbox_size).min(row_h);

    let fitting = ((size.height - top).max(0.0) / row_h).floor() as usize;
    let rows = if meta.fill_blank_rows {
        meta.items.len().max(fitting)
    } else {
        meta.items.len()
    };

    for row in 0..rows {
        let y = top + row_h * row as f64;
        let checkbox = Rect::new(
            pad,
            y + (row_h - box_size) / 2.0,
            pad + box_size,
            y + (row_h + box_size) / 2.0,
        );
        tree.push(Primitive::rect(
            checkbox,
            Some(meta.style.background),
            Some(meta.style.border),
            Role::Body,
        ));
        tree.push(Primitive::line(
            Point::new(pad, y + row_h),
            Point::new(size.width - pad, y + row_h),
            meta.style.line,
            Role::Body,
        ));

        let Some(item) = meta.items.get(row) else {
            continue;
        };
        if item.checked {
            tree.push(check_mark(checkbox, meta));
        }
        let font = if item.checked {
            let faded = meta.style.body_font.color.faded(0.5);
            meta.style.body_font.clone().with_color(faded)
        } else {
            meta.style.body_font.clone()
        };
        let x0 = (checkbox.x1 + pad).min(size.width);
        tree.push(Primitive::text(
            Rect::new(x0, y, (size.width - pad).max(x0), y + row_h),
            item.text.clone(),
            &font,
            TextAlign::Left,
            VerticalAlign::Middle,
            Role::Content,
        ));
    }
    tree
}

/// Frame and optional header. Returns the top of the body area.
fn shell(tree: &mut GraphicsTree, size: Size, header: &PlannerHeader, style: &PlannerStyle) -> f64 {
    frame(tree, size, style.background, style.border);
    let top = header.body_top().min(size.height);
    if header.show_header {
        let band = Rect::new(0.0, 0.0, size.width, top);
        tree.push(Primitive::rect(band, Some(header.background), None, Role::Header));
        let pad = padding(style, size);
        tree.push(Primitive::text(
            Rect::new(pad, 0.0, size.width - pad, top),
            header.title.clone(),
            &header.font,
            TextAlign::Left,
            VerticalAlign::Middle,
            Role::Header,
        ));
    }
    top
}

fn padding(style: &PlannerStyle, size: Size) -> f64 {
    safe_len(style.padding, 0.0).min(size.width / 2.0)
}

fn check_mark(checkbox: Rect, meta: &ChecklistMetadata) -> Primitive {
    let w = checkbox.width();
    let h = checkbox.height();
    let mut path = BezPath::new();
    path.move_to(Point::new(checkbox.x0 + w * 0.2, checkbox.y0 + h * 0.55));
    path.line_to(Point::new(checkbox.x0 + w * 0.42, checkbox.y0 + h * 0.78));
    path.line_to(Point::new(checkbox.x0 + w * 0.82, checkbox.y0 + h * 0.25));
    Primitive::Path {
        path,
        fill: None,
        stroke: Some(Border::new(meta.check_color, (w * 0.14).max(f64::EPSILON))),
        role: Role::Marker,
    }
}
