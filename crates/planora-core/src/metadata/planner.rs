//! Planner blocks: notes, schedules and checklists.
//!
//! All three share a [`PlannerHeader`]. Hiding the header changes layout,
//! not just paint: body content then starts at the header's `inset`
//! ([`NO_HEADER_INSET`] unless scaled) no matter what `header_height` says.

use crate::color::SerializableColor;
use crate::style::{Border, FontSpec, FontWeight, StrokeStyle};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Default top inset of the body when the header is hidden.
pub const NO_HEADER_INSET: f64 = 18.0;

/// Header band shared by planner blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerHeader {
    pub show_header: bool,
    pub header_height: f64,
    /// Body offset used while the header is hidden.
    pub inset: f64,
    pub title: String,
    pub background: SerializableColor,
    pub font: FontSpec,
}

impl Default for PlannerHeader {
    fn default() -> Self {
        Self {
            show_header: true,
            header_height: 36.0,
            inset: NO_HEADER_INSET,
            title: String::new(),
            background: SerializableColor::rgb(0x1e, 0x40, 0xaf),
            font: FontSpec::new(16.0, FontWeight::Bold, SerializableColor::white()),
        }
    }
}

impl PlannerHeader {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Vertical origin of body content, relative to the block's top edge.
    pub fn body_top(&self) -> f64 {
        if !self.show_header {
            if self.inset.is_finite() && self.inset >= 0.0 {
                return self.inset;
            }
            log::warn!("invalid planner inset {}, using {NO_HEADER_INSET}", self.inset);
            return NO_HEADER_INSET;
        }
        if self.header_height.is_finite() {
            self.header_height.max(0.0)
        } else {
            log::warn!("non-finite planner header height, using default");
            PlannerHeader::default().header_height
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            header_height: self.header_height * factor,
            inset: self.inset * factor,
            font: self.font.scaled(factor),
            ..self.clone()
        }
    }
}

/// Body styling shared by planner blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerStyle {
    pub background: SerializableColor,
    pub border: Border,
    pub body_font: FontSpec,
    pub line: Border,
    pub padding: f64,
}

impl Default for PlannerStyle {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            border: Border::new(SerializableColor::rgb(0x9c, 0xa3, 0xaf), 1.0),
            body_font: FontSpec::default(),
            line: Border::new(SerializableColor::rgb(0xe5, 0xe7, 0xeb), 1.0),
            padding: 10.0,
        }
    }
}

impl PlannerStyle {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            border: self.border.scaled(factor),
            body_font: self.body_font.scaled(factor),
            line: self.line.scaled(factor),
            padding: self.padding * factor,
            ..self.clone()
        }
    }
}

/// Ruled note area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerNoteMetadata {
    pub size: Size,
    pub header: PlannerHeader,
    pub line_count: u32,
    /// `None` leaves the body blank.
    pub line_style: Option<StrokeStyle>,
    pub text: String,
    pub style: PlannerStyle,
}

impl Default for PlannerNoteMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(300.0, 240.0),
            header: PlannerHeader::titled("Notes"),
            line_count: 6,
            line_style: Some(StrokeStyle::Solid),
            text: String::new(),
            style: PlannerStyle::default(),
        }
    }
}

impl PlannerNoteMetadata {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            header: self.header.scaled(factor),
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

/// Text written into one schedule slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Zero-based slot index from `start_hour`.
    pub slot: u32,
    pub text: String,
}

/// Hourly (or finer) time-slot column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleMetadata {
    pub size: Size,
    pub header: PlannerHeader,
    pub start_hour: u32,
    pub end_hour: u32,
    pub interval_minutes: u32,
    pub show_time_labels: bool,
    pub time_label_width: f64,
    pub use_24_hour: bool,
    pub entries: Vec<ScheduleEntry>,
    pub style: PlannerStyle,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(280.0, 420.0),
            header: PlannerHeader::titled("Schedule"),
            start_hour: 8,
            end_hour: 18,
            interval_minutes: 60,
            show_time_labels: true,
            time_label_width: 52.0,
            use_24_hour: false,
            entries: Vec::new(),
            style: PlannerStyle::default(),
        }
    }
}

impl ScheduleMetadata {
    /// Start/end hour and interval with malformed values replaced.
    pub fn resolved_range(&self) -> (u32, u32, u32) {
        let start = self.start_hour.min(23);
        let end = if self.end_hour > start && self.end_hour <= 24 {
            self.end_hour
        } else {
            log::warn!(
                "schedule end hour {} invalid for start {}, clamping",
                self.end_hour,
                start
            );
            (start + 1).max(self.end_hour.min(24))
        };
        let interval = match self.interval_minutes {
            0 => {
                log::warn!("schedule interval of 0 minutes, using 60");
                60
            }
            m => m.min(24 * 60),
        };
        (start, end, interval)
    }

    /// Number of slots between start and end hour.
    pub fn slot_count(&self) -> u32 {
        let (start, end, interval) = self.resolved_range();
        ((end - start) * 60).div_ceil(interval).max(1)
    }

    /// Label for a slot, e.g. "9 AM" or "09:00".
    pub fn slot_label(&self, slot: u32) -> String {
        let (start, _, interval) = self.resolved_range();
        let minutes = start * 60 + slot * interval;
        let (hour, minute) = ((minutes / 60) % 24, minutes % 60);
        if self.use_24_hour {
            format!("{hour:02}:{minute:02}")
        } else {
            let suffix = if hour < 12 { "AM" } else { "PM" };
            let h12 = match hour % 12 {
                0 => 12,
                h => h,
            };
            if minute == 0 {
                format!("{h12} {suffix}")
            } else {
                format!("{h12}:{minute:02} {suffix}")
            }
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            header: self.header.scaled(factor),
            time_label_width: self.time_label_width * factor,
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

/// One checklist line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }
}

/// To-do list with checkboxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistMetadata {
    pub size: Size,
    pub header: PlannerHeader,
    pub items: Vec<ChecklistItem>,
    pub checkbox_size: f64,
    pub row_height: f64,
    /// Fill the remaining height with empty checkbox rows.
    pub fill_blank_rows: bool,
    pub check_color: SerializableColor,
    pub style: PlannerStyle,
}

impl Default for ChecklistMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(260.0, 300.0),
            header: PlannerHeader::titled("To Do"),
            items: Vec::new(),
            checkbox_size: 14.0,
            row_height: 28.0,
            fill_blank_rows: true,
            check_color: SerializableColor::rgb(0x16, 0xa3, 0x4a),
            style: PlannerStyle::default(),
        }
    }
}

impl ChecklistMetadata {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            header: self.header.scaled(factor),
            checkbox_size: self.checkbox_size * factor,
            row_height: self.row_height * factor,
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}
