//! Calendar-family metadata: month grids, week strips and single date cells.

use crate::color::SerializableColor;
use crate::dates::{WeekdayFormat, first_of_month};
use crate::style::{Border, FontSpec, FontWeight};
use chrono::NaiveDate;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Visual treatment for days that have a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayStyle {
    /// Thin bar along the bottom of the cell.
    #[default]
    Bar,
    /// Small dot in the top-right corner.
    Dot,
    /// Small square in the top-right corner.
    Square,
    /// Tinted cell background.
    Background,
    /// Day number drawn in the holiday colour.
    Text,
    /// Coloured outline inside the cell.
    Border,
    /// Corner triangle in the top-right corner.
    Triangle,
}

impl HolidayStyle {
    pub fn all() -> &'static [HolidayStyle] {
        &[
            HolidayStyle::Bar,
            HolidayStyle::Dot,
            HolidayStyle::Square,
            HolidayStyle::Background,
            HolidayStyle::Text,
            HolidayStyle::Border,
            HolidayStyle::Triangle,
        ]
    }
}

/// Whether and how holidays are shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HolidayDisplay {
    pub show: bool,
    pub style: HolidayStyle,
    pub color: SerializableColor,
    /// Print the holiday name under the day number.
    pub show_names: bool,
}

impl Default for HolidayDisplay {
    fn default() -> Self {
        Self {
            show: true,
            style: HolidayStyle::Bar,
            color: SerializableColor::rgb(0xdc, 0x26, 0x26),
            show_names: false,
        }
    }
}

/// Colours, borders and fonts for calendar elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarStyle {
    pub background: SerializableColor,
    pub border: Border,
    pub grid: Border,
    pub title_font: FontSpec,
    pub weekday_font: FontSpec,
    pub day_font: FontSpec,
    pub title_background: Option<SerializableColor>,
    pub weekday_background: Option<SerializableColor>,
    pub weekend_color: SerializableColor,
    pub adjacent_color: SerializableColor,
    pub cell_padding: f64,
}

impl Default for CalendarStyle {
    fn default() -> Self {
        let ink = SerializableColor::rgb(0x1f, 0x29, 0x37);
        Self {
            background: SerializableColor::white(),
            border: Border::new(SerializableColor::rgb(0x9c, 0xa3, 0xaf), 1.0),
            grid: Border::default(),
            title_font: FontSpec::new(22.0, FontWeight::Bold, ink),
            weekday_font: FontSpec::new(12.0, FontWeight::Bold, SerializableColor::rgb(0x4b, 0x55, 0x63)),
            day_font: FontSpec::new(14.0, FontWeight::Regular, ink),
            title_background: None,
            weekday_background: Some(SerializableColor::rgb(0xf3, 0xf4, 0xf6)),
            weekend_color: SerializableColor::rgb(0xb9, 0x1c, 0x1c),
            adjacent_color: SerializableColor::rgb(0xc4, 0xc8, 0xcf),
            cell_padding: 4.0,
        }
    }
}

impl CalendarStyle {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            border: self.border.scaled(factor),
            grid: self.grid.scaled(factor),
            title_font: self.title_font.scaled(factor),
            weekday_font: self.weekday_font.scaled(factor),
            day_font: self.day_font.scaled(factor),
            cell_padding: self.cell_padding * factor,
            ..self.clone()
        }
    }
}

/// A full month laid out as a grid of day cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarGridMetadata {
    pub size: Size,
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    /// First weekday column, 0 = Sunday.
    pub start_day: u8,
    /// Replaces the generated "Month Year" title.
    pub title: Option<String>,
    pub show_title: bool,
    pub show_weekdays: bool,
    /// Print the day numbers of overflow days from adjacent months.
    pub show_adjacent_days: bool,
    /// Always lay out six week rows.
    pub fixed_weeks: bool,
    pub weekday_format: WeekdayFormat,
    pub highlight_weekends: bool,
    pub title_height: f64,
    pub weekday_height: f64,
    pub holidays: HolidayDisplay,
    pub style: CalendarStyle,
}

impl Default for CalendarGridMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(600.0, 480.0),
            year: 2025,
            month: 1,
            start_day: 0,
            title: None,
            show_title: true,
            show_weekdays: true,
            show_adjacent_days: true,
            fixed_weeks: false,
            weekday_format: WeekdayFormat::Short,
            highlight_weekends: true,
            title_height: 48.0,
            weekday_height: 28.0,
            holidays: HolidayDisplay::default(),
            style: CalendarStyle::default(),
        }
    }
}

impl CalendarGridMetadata {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_start_day(mut self, start_day: u8) -> Self {
        self.start_day = start_day;
        self
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            title_height: self.title_height * factor,
            weekday_height: self.weekday_height * factor,
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

/// Seven consecutive days side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeekStripMetadata {
    pub size: Size,
    /// Any date inside the week; the strip aligns to `start_day`.
    pub start_date: NaiveDate,
    pub start_day: u8,
    pub title: Option<String>,
    pub show_title: bool,
    pub show_weekdays: bool,
    pub weekday_format: WeekdayFormat,
    pub highlight_weekends: bool,
    pub title_height: f64,
    pub weekday_height: f64,
    /// Horizontal writing lines drawn in every day column.
    pub time_slots: u32,
    pub holidays: HolidayDisplay,
    pub style: CalendarStyle,
}

impl Default for WeekStripMetadata {
    fn default() -> Self {
        Self {
            size: Size::new(700.0, 160.0),
            start_date: first_of_month(2025, 1),
            start_day: 1,
            title: None,
            show_title: true,
            show_weekdays: true,
            weekday_format: WeekdayFormat::Short,
            highlight_weekends: true,
            title_height: 36.0,
            weekday_height: 24.0,
            time_slots: 0,
            holidays: HolidayDisplay::default(),
            style: CalendarStyle::default(),
        }
    }
}

impl WeekStripMetadata {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            title_height: self.title_height * factor,
            weekday_height: self.weekday_height * factor,
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

/// A single large date tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateCellMetadata {
    pub size: Size,
    pub date: NaiveDate,
    pub show_weekday: bool,
    pub show_month: bool,
    pub weekday_format: WeekdayFormat,
    pub holidays: HolidayDisplay,
    pub style: CalendarStyle,
}

impl Default for DateCellMetadata {
    fn default() -> Self {
        let style = CalendarStyle {
            day_font: FontSpec::new(48.0, FontWeight::Bold, SerializableColor::rgb(0x1f, 0x29, 0x37)),
            cell_padding: 8.0,
            ..CalendarStyle::default()
        };
        Self {
            size: Size::new(160.0, 160.0),
            date: first_of_month(2025, 1),
            show_weekday: true,
            show_month: true,
            weekday_format: WeekdayFormat::Long,
            holidays: HolidayDisplay {
                show_names: true,
                ..HolidayDisplay::default()
            },
            style,
        }
    }
}

impl DateCellMetadata {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            style: self.style.scaled(factor),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let meta: CalendarGridMetadata =
            serde_json::from_str(r#"{"year": 2024, "month": 2, "startDay": 1}"#).unwrap();
        assert_eq!(meta.year, 2024);
        assert_eq!(meta.month, 2);
        assert_eq!(meta.start_day, 1);
        assert!(meta.show_weekdays);
        assert_eq!(meta.holidays.style, HolidayStyle::Bar);
    }

    #[test]
    fn test_holiday_style_names() {
        let json = serde_json::to_string(&HolidayStyle::Triangle).unwrap();
        assert_eq!(json, "\"triangle\"");
        assert_eq!(HolidayStyle::all().len(), 7);
    }

    #[test]
    fn test_scaled_doubles_geometry() {
        let meta = CalendarGridMetadata::default().scaled(2.0);
        assert!((meta.size.width - 1200.0).abs() < f64::EPSILON);
        assert!((meta.title_height - 96.0).abs() < f64::EPSILON);
        assert!((meta.style.day_font.size - 28.0).abs() < f64::EPSILON);
    }
}
