//! Element metadata: the semantic, serializable description of a placeable
//! element, independent of where it sits on the page.
//!
//! Metadata is the single source of truth for an element. Graphics are
//! always regenerated from it by the [`compiler`](crate::compiler).

mod calendar;
mod collage;
mod planner;
mod table;

pub use calendar::{
    CalendarGridMetadata, CalendarStyle, DateCellMetadata, HolidayDisplay, HolidayStyle,
    WeekStripMetadata,
};
pub use collage::{CollageLayout, CollageMetadata, CollageSlot};
pub use planner::{
    ChecklistItem, ChecklistMetadata, NO_HEADER_INSET, PlannerHeader, PlannerNoteMetadata,
    PlannerStyle, ScheduleEntry, ScheduleMetadata,
};
pub use table::{
    CellContent, CellMerge, RowBand, TableMetadata, TableStyle, prefix_offsets, redistribute,
};

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Discriminator of [`ElementMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    CalendarGrid,
    WeekStrip,
    DateCell,
    PlannerNote,
    Schedule,
    Checklist,
    Collage,
    Table,
}

impl ElementKind {
    /// Wire name, matching the `kind` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::CalendarGrid => "calendar-grid",
            ElementKind::WeekStrip => "week-strip",
            ElementKind::DateCell => "date-cell",
            ElementKind::PlannerNote => "planner-note",
            ElementKind::Schedule => "schedule",
            ElementKind::Checklist => "checklist",
            ElementKind::Collage => "collage",
            ElementKind::Table => "table",
        }
    }

    /// Human-readable default name.
    pub fn display_name(self) -> &'static str {
        match self {
            ElementKind::CalendarGrid => "Calendar",
            ElementKind::WeekStrip => "Week",
            ElementKind::DateCell => "Date",
            ElementKind::PlannerNote => "Notes",
            ElementKind::Schedule => "Schedule",
            ElementKind::Checklist => "Checklist",
            ElementKind::Collage => "Collage",
            ElementKind::Table => "Table",
        }
    }

    /// Whether compiling this kind consults the holiday lookup.
    pub fn uses_holidays(self) -> bool {
        matches!(
            self,
            ElementKind::CalendarGrid | ElementKind::WeekStrip | ElementKind::DateCell
        )
    }
}

/// Semantic description of one placeable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementMetadata {
    CalendarGrid(CalendarGridMetadata),
    WeekStrip(WeekStripMetadata),
    DateCell(DateCellMetadata),
    PlannerNote(PlannerNoteMetadata),
    Schedule(ScheduleMetadata),
    Checklist(ChecklistMetadata),
    Collage(CollageMetadata),
    Table(TableMetadata),
}

impl ElementMetadata {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementMetadata::CalendarGrid(_) => ElementKind::CalendarGrid,
            ElementMetadata::WeekStrip(_) => ElementKind::WeekStrip,
            ElementMetadata::DateCell(_) => ElementKind::DateCell,
            ElementMetadata::PlannerNote(_) => ElementKind::PlannerNote,
            ElementMetadata::Schedule(_) => ElementKind::Schedule,
            ElementMetadata::Checklist(_) => ElementKind::Checklist,
            ElementMetadata::Collage(_) => ElementKind::Collage,
            ElementMetadata::Table(_) => ElementKind::Table,
        }
    }

    /// Size in canvas pixels.
    pub fn size(&self) -> Size {
        match self {
            ElementMetadata::CalendarGrid(m) => m.size,
            ElementMetadata::WeekStrip(m) => m.size,
            ElementMetadata::DateCell(m) => m.size,
            ElementMetadata::PlannerNote(m) => m.size,
            ElementMetadata::Schedule(m) => m.size,
            ElementMetadata::Checklist(m) => m.size,
            ElementMetadata::Collage(m) => m.size,
            ElementMetadata::Table(m) => m.size,
        }
    }

    /// Copy with a new size. Tables scale their explicit tracks to fit.
    pub fn with_size(&self, size: Size) -> Self {
        let mut next = self.clone();
        match &mut next {
            ElementMetadata::CalendarGrid(m) => m.size = size,
            ElementMetadata::WeekStrip(m) => m.size = size,
            ElementMetadata::DateCell(m) => m.size = size,
            ElementMetadata::PlannerNote(m) => m.size = size,
            ElementMetadata::Schedule(m) => m.size = size,
            ElementMetadata::Checklist(m) => m.size = size,
            ElementMetadata::Collage(m) => m.size = size,
            ElementMetadata::Table(m) => return ElementMetadata::Table(m.resized(size)),
        }
        next
    }

    /// Copy with every pixel quantity (size, fonts, strokes, insets)
    /// multiplied by `factor`. Used to compile at export resolutions.
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            ElementMetadata::CalendarGrid(m) => ElementMetadata::CalendarGrid(m.scaled(factor)),
            ElementMetadata::WeekStrip(m) => ElementMetadata::WeekStrip(m.scaled(factor)),
            ElementMetadata::DateCell(m) => ElementMetadata::DateCell(m.scaled(factor)),
            ElementMetadata::PlannerNote(m) => ElementMetadata::PlannerNote(m.scaled(factor)),
            ElementMetadata::Schedule(m) => ElementMetadata::Schedule(m.scaled(factor)),
            ElementMetadata::Checklist(m) => ElementMetadata::Checklist(m.scaled(factor)),
            ElementMetadata::Collage(m) => ElementMetadata::Collage(m.scaled(factor)),
            ElementMetadata::Table(m) => ElementMetadata::Table(m.scaled(factor)),
        }
    }

    pub fn as_table(&self) -> Option<&TableMetadata> {
        match self {
            ElementMetadata::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ElementMetadata::Table(_))
    }
}

impl From<TableMetadata> for ElementMetadata {
    fn from(m: TableMetadata) -> Self {
        ElementMetadata::Table(m)
    }
}

impl From<CalendarGridMetadata> for ElementMetadata {
    fn from(m: CalendarGridMetadata) -> Self {
        ElementMetadata::CalendarGrid(m)
    }
}

impl From<ScheduleMetadata> for ElementMetadata {
    fn from(m: ScheduleMetadata) -> Self {
        ElementMetadata::Schedule(m)
    }
}

impl From<PlannerNoteMetadata> for ElementMetadata {
    fn from(m: PlannerNoteMetadata) -> Self {
        ElementMetadata::PlannerNote(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_roundtrip() {
        let meta = ElementMetadata::Table(TableMetadata::default());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "table");
        assert_eq!(json["columns"], 3);
        let back: ElementMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_minimal_json_fills_defaults() {
        let meta: ElementMetadata =
            serde_json::from_str(r#"{"kind":"schedule","header":{"showHeader":false}}"#).unwrap();
        assert_eq!(meta.kind(), ElementKind::Schedule);
        let ElementMetadata::Schedule(schedule) = meta else {
            panic!("expected schedule");
        };
        assert!(!schedule.header.show_header);
        assert_eq!(schedule.start_hour, 8);
    }

    #[test]
    fn test_kind_names_match_tags() {
        for meta in [
            ElementMetadata::CalendarGrid(CalendarGridMetadata::default()),
            ElementMetadata::WeekStrip(WeekStripMetadata::default()),
            ElementMetadata::DateCell(DateCellMetadata::default()),
            ElementMetadata::PlannerNote(PlannerNoteMetadata::default()),
            ElementMetadata::Schedule(ScheduleMetadata::default()),
            ElementMetadata::Checklist(ChecklistMetadata::default()),
            ElementMetadata::Collage(CollageMetadata::default()),
            ElementMetadata::Table(TableMetadata::default()),
        ] {
            let json = serde_json::to_value(&meta).unwrap();
            assert_eq!(json["kind"], meta.kind().as_str());
        }
    }

    #[test]
    fn test_with_size() {
        let meta = ElementMetadata::CalendarGrid(CalendarGridMetadata::default());
        let resized = meta.with_size(Size::new(100.0, 50.0));
        assert_eq!(resized.size(), Size::new(100.0, 50.0));
        assert_eq!(meta.size(), CalendarGridMetadata::default().size);
    }
}
