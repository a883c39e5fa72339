//! Metadata-to-graphics compiler.
//!
//! [`compile`] is a pure function of its inputs: the same metadata and the
//! same holiday data always produce the same [`GraphicsTree`]. Malformed
//! metadata never fails compilation; each element falls back to sane
//! defaults and logs a warning.
//!
//! Element trees are produced in element-local coordinates with the
//! element's top-left corner at the origin. [`compile_object`] places a
//! canvas object's tree at its `x`/`y`.

mod calendar;
mod collage;
mod planner;
mod shape;
mod table;

pub use calendar::holiday_marker;

use crate::color::SerializableColor;
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::holiday::HolidayLookup;
use crate::metadata::ElementMetadata;
use crate::object::CanvasObject;
use crate::style::Border;
use kurbo::{Rect, Size, Vec2};

/// Compile one element's metadata into drawable primitives.
pub fn compile<H: HolidayLookup + ?Sized>(metadata: &ElementMetadata, holidays: &H) -> GraphicsTree {
    log::debug!("compiling {} element", metadata.kind().as_str());
    match metadata {
        ElementMetadata::CalendarGrid(m) => calendar::compile_month(m, holidays),
        ElementMetadata::WeekStrip(m) => calendar::compile_week(m, holidays),
        ElementMetadata::DateCell(m) => calendar::compile_date_cell(m, holidays),
        ElementMetadata::PlannerNote(m) => planner::compile_note(m),
        ElementMetadata::Schedule(m) => planner::compile_schedule(m),
        ElementMetadata::Checklist(m) => planner::compile_checklist(m),
        ElementMetadata::Collage(m) => collage::compile(m),
        ElementMetadata::Table(m) => table::compile(m),
    }
}

/// Compile at an export resolution. Every pixel quantity in the metadata is
/// multiplied by `factor` before compiling, so the result is the original
/// layout scaled uniformly.
pub fn compile_scaled<H: HolidayLookup + ?Sized>(
    metadata: &ElementMetadata,
    factor: f64,
    holidays: &H,
) -> GraphicsTree {
    if !factor.is_finite() || factor <= 0.0 {
        log::warn!("invalid export scale {factor}, compiling at 1x");
        return compile(metadata, holidays);
    }
    compile(&metadata.scaled(factor), holidays)
}

/// Compile a placed canvas object into absolute canvas coordinates.
///
/// Groups compile to an empty tree; their children are separate objects.
pub fn compile_object<H: HolidayLookup + ?Sized>(object: &CanvasObject, holidays: &H) -> GraphicsTree {
    let local = shape::compile_properties(object, holidays);
    local.translated(Vec2::new(object.x, object.y))
}

/// Size with non-finite or negative extents replaced by zero.
pub(crate) fn safe_size(size: Size) -> Size {
    let fix = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let fixed = Size::new(fix(size.width), fix(size.height));
    if fixed != size {
        log::warn!("element size {size:?} is not usable, clamping to {fixed:?}");
    }
    fixed
}

/// Finite, non-negative length or the fallback.
pub(crate) fn safe_len(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("invalid length {value}, using {fallback}");
        fallback
    }
}

/// Background and border for a whole element.
pub(crate) fn frame(tree: &mut GraphicsTree, size: Size, background: SerializableColor, border: Border) {
    tree.push(Primitive::rect(
        Rect::from_origin_size((0.0, 0.0), size),
        Some(background).filter(|c| !c.is_transparent()),
        Some(border),
        Role::Frame,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::NoHolidays;
    use crate::metadata::{
        CalendarGridMetadata, ChecklistMetadata, CollageMetadata, DateCellMetadata,
        PlannerNoteMetadata, ScheduleMetadata, TableMetadata, WeekStripMetadata,
    };

    fn all_kinds() -> Vec<ElementMetadata> {
        vec![
            CalendarGridMetadata::default().into(),
            ElementMetadata::WeekStrip(WeekStripMetadata::default()),
            ElementMetadata::DateCell(DateCellMetadata::default()),
            PlannerNoteMetadata::default().into(),
            ScheduleMetadata::default().into(),
            ElementMetadata::Checklist(ChecklistMetadata::default()),
            ElementMetadata::Collage(CollageMetadata::default()),
            TableMetadata::default().into(),
        ]
    }

    #[test]
    fn test_compile_is_idempotent() {
        for meta in all_kinds() {
            let first = compile(&meta, &NoHolidays);
            let second = compile(&meta, &NoHolidays);
            assert_eq!(first, second, "{:?}", meta.kind());
            assert!(!first.is_empty());
        }
    }

    #[test]
    fn test_json_roundtrip_compiles_identically() {
        for meta in all_kinds() {
            let json = serde_json::to_string(&meta).unwrap();
            let back: ElementMetadata = serde_json::from_str(&json).unwrap();
            assert_eq!(compile(&meta, &NoHolidays), compile(&back, &NoHolidays));
        }
    }

    #[test]
    fn test_trees_stay_inside_element_bounds() {
        for meta in all_kinds() {
            let size = meta.size();
            let bounds = compile(&meta, &NoHolidays).bounds().unwrap();
            assert!(bounds.x0 >= -1e-9 && bounds.y0 >= -1e-9, "{:?}", meta.kind());
            assert!(bounds.x1 <= size.width + 1e-9, "{:?}", meta.kind());
            assert!(bounds.y1 <= size.height + 1e-9, "{:?}", meta.kind());
        }
    }

    #[test]
    fn test_scaled_compile_is_proportional() {
        for meta in all_kinds() {
            let base = compile(&meta, &NoHolidays);
            let double = compile_scaled(&meta, 2.0, &NoHolidays);
            assert_eq!(base.len(), double.len(), "{:?}", meta.kind());
            let (a, b) = (base.bounds().unwrap(), double.bounds().unwrap());
            assert!((b.width() - a.width() * 2.0).abs() < 1e-6, "{:?}", meta.kind());
            assert!((b.height() - a.height() * 2.0).abs() < 1e-6, "{:?}", meta.kind());
        }
    }

    #[test]
    fn test_scaled_hidden_header_scales_inset() {
        let meta: ElementMetadata = ScheduleMetadata {
            header: crate::metadata::PlannerHeader {
                show_header: false,
                ..Default::default()
            },
            ..ScheduleMetadata::default()
        }
        .into();
        let body_top = |tree: &GraphicsTree| {
            tree.iter()
                .filter(|p| matches!(p.role(), Role::Body | Role::Label | Role::Content))
                .map(|p| p.top())
                .fold(f64::INFINITY, f64::min)
        };
        let base = body_top(&compile(&meta, &NoHolidays));
        let double = body_top(&compile_scaled(&meta, 2.0, &NoHolidays));
        assert!((base - 18.0).abs() < 1e-9);
        assert!((double - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_size_does_not_panic() {
        let meta = ElementMetadata::Table(TableMetadata {
            size: Size::new(f64::NAN, f64::INFINITY),
            ..TableMetadata::default()
        });
        let tree = compile(&meta, &NoHolidays);
        assert!(tree.iter().all(|p| {
            let b = p.bounds();
            b.x0.is_finite() && b.y0.is_finite() && b.x1.is_finite() && b.y1.is_finite()
        }));
    }
}
