//! Month and week grids.
//!
//! Weekday indices follow the Sunday-first convention used by element
//! metadata: 0 = Sunday … 6 = Saturday.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// How weekday labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayFormat {
    /// "Mon"
    #[default]
    Short,
    /// "M"
    Narrow,
    /// "Monday"
    Long,
}

/// English month name for `month` (1-based). Out-of-range months are clamped.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Label for a Sunday-first weekday index.
pub fn weekday_label(weekday: u8, format: WeekdayFormat) -> &'static str {
    let name = WEEKDAY_NAMES[(weekday % 7) as usize];
    match format {
        WeekdayFormat::Long => name,
        WeekdayFormat::Short => &name[..3],
        WeekdayFormat::Narrow => &name[..1],
    }
}

/// Sunday-first weekday index of a date.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Whether a Sunday-first weekday index falls on a weekend.
pub fn is_weekend(weekday: u8) -> bool {
    matches!(weekday % 7, 0 | 6)
}

/// Number of days in a month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = first_of_month(year, month);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first);
    (next - first).num_days().max(28) as u32
}

/// First day of the month, falling back to the Unix epoch for dates chrono
/// cannot represent.
pub fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1).unwrap_or_else(|| {
        log::warn!("unrepresentable month {year}-{month}, using epoch");
        NaiveDate::default()
    })
}

/// One day slot in a month or week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub date: NaiveDate,
    /// Sunday-first weekday index.
    pub weekday: u8,
    /// False for overflow days from the previous or next month.
    pub is_current_month: bool,
}

impl DaySlot {
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// A month resolved into rows of seven days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub start_day: u8,
    pub weeks: Vec<[DaySlot; 7]>,
}

impl MonthGrid {
    /// Resolve the day grid for `year`/`month` with `start_day` as the first
    /// column. Only as many weeks as needed are produced (4 to 6).
    pub fn new(year: i32, month: u32, start_day: u8) -> Self {
        let start_day = start_day % 7;
        let month = month.clamp(1, 12);
        let first = first_of_month(year, month);
        let offset = (weekday_index(first) + 7 - start_day) % 7;
        let total = offset as u32 + days_in_month(first.year(), first.month());
        let week_count = total.div_ceil(7) as usize;
        let grid_start = first
            .checked_sub_days(Days::new(offset as u64))
            .unwrap_or(first);

        let weeks = (0..week_count)
            .map(|w| week_from(grid_start, w as u64 * 7, first.month()))
            .collect();

        Self {
            year: first.year(),
            month: first.month(),
            start_day,
            weeks,
        }
    }

    /// Pad with trailing overflow weeks until the grid has six rows.
    pub fn padded_to_six_weeks(mut self) -> Self {
        while self.weeks.len() < 6 {
            let Some(last) = self.weeks.last() else { break };
            let start = last[6].date;
            self.weeks.push(week_from(start, 1, self.month));
        }
        self
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w[0].date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w[6].date)
    }

    /// All slots in row-major order.
    pub fn days(&self) -> impl Iterator<Item = &DaySlot> {
        self.weeks.iter().flat_map(|w| w.iter())
    }

    /// Column order of weekday indices.
    pub fn column_weekdays(&self) -> [u8; 7] {
        std::array::from_fn(|i| ((self.start_day as usize + i) % 7) as u8)
    }
}

fn week_from(start: NaiveDate, skip: u64, current_month: u32) -> [DaySlot; 7] {
    std::array::from_fn(|i| {
        let date = start
            .checked_add_days(Days::new(skip + i as u64))
            .unwrap_or(start);
        DaySlot {
            date,
            weekday: weekday_index(date),
            is_current_month: date.month() == current_month,
        }
    })
}

/// The seven days of the week containing `date`, starting on `start_day`.
pub fn week_days(date: NaiveDate, start_day: u8) -> [DaySlot; 7] {
    let back = (weekday_index(date) + 7 - start_day % 7) % 7;
    let start = date.checked_sub_days(Days::new(back as u64)).unwrap_or(date);
    week_from(start, 0, date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_january_2024_sunday_start() {
        // 2024-01-01 is a Monday.
        let grid = MonthGrid::new(2024, 1, 0);
        assert_eq!(grid.weeks.len(), 5);
        let first = grid.weeks[0][0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(!first.is_current_month);
        assert_eq!(grid.weeks[0][1].day(), 1);
        assert!(grid.weeks[0][1].is_current_month);
    }

    #[test]
    fn test_monday_start_has_no_leading_overflow() {
        let grid = MonthGrid::new(2024, 1, 1);
        assert_eq!(grid.weeks[0][0].day(), 1);
        assert_eq!(grid.column_weekdays(), [1, 2, 3, 4, 5, 6, 0]);
    }

    #[test]
    fn test_february_2026_fits_four_weeks() {
        // 2026-02-01 is a Sunday, 28 days.
        let grid = MonthGrid::new(2026, 2, 0);
        assert_eq!(grid.weeks.len(), 4);
        assert_eq!(grid.padded_to_six_weeks().weeks.len(), 6);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_out_of_range_month_clamped() {
        let grid = MonthGrid::new(2024, 13, 9);
        assert_eq!(grid.month, 12);
        assert_eq!(grid.start_day, 2);
    }

    #[test]
    fn test_week_days() {
        let wed = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let week = week_days(wed, 1);
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(week[6].date, NaiveDate::from_ymd_opt(2024, 5, 19).unwrap());
    }

    #[test]
    fn test_labels() {
        assert_eq!(month_name(3), "March");
        assert_eq!(weekday_label(1, WeekdayFormat::Short), "Mon");
        assert_eq!(weekday_label(6, WeekdayFormat::Narrow), "S");
        assert!(is_weekend(0) && is_weekend(6) && !is_weekend(3));
    }
}
