//! Holiday lookup seam.
//!
//! The engine owns no holiday data. Callers inject a [`HolidayLookup`] at
//! compile time; an empty answer is always acceptable.

use crate::color::SerializableColor;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    #[default]
    Public,
    Observance,
    Custom,
}

/// A single dated holiday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub kind: HolidayKind,
    /// Overrides the marker colour configured on the element.
    #[serde(default)]
    pub color: Option<SerializableColor>,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::Public,
            color: None,
        }
    }
}

/// Source of holidays for a given year.
///
/// The compiler treats this as a total function: it does not catch panics
/// raised by an implementation.
pub trait HolidayLookup {
    fn holidays(&self, year: i32) -> Vec<Holiday>;
}

impl<F> HolidayLookup for F
where
    F: Fn(i32) -> Vec<Holiday>,
{
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        self(year)
    }
}

/// A lookup that never returns anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayLookup for NoHolidays {
    fn holidays(&self, _year: i32) -> Vec<Holiday> {
        Vec::new()
    }
}

/// A fixed list of holidays, e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayTable(pub Vec<Holiday>);

impl HolidayLookup for HolidayTable {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        self.0
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect()
    }
}

/// Holidays for a contiguous date range, keyed by date.
#[derive(Debug, Clone, Default)]
pub(crate) struct HolidayIndex {
    by_date: BTreeMap<NaiveDate, Vec<Holiday>>,
}

impl HolidayIndex {
    /// Query every year touched by `first..=last` and keep the days in range.
    pub(crate) fn for_range<H: HolidayLookup + ?Sized>(
        lookup: &H,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<Holiday>> = BTreeMap::new();
        for year in first.year()..=last.year() {
            for holiday in lookup.holidays(year) {
                if holiday.date >= first && holiday.date <= last {
                    by_date.entry(holiday.date).or_default().push(holiday);
                }
            }
        }
        Self { by_date }
    }

    /// First holiday on `date`, if any.
    pub(crate) fn first_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.by_date.get(&date).and_then(|list| list.first())
    }

    /// All holidays on `date`.
    pub(crate) fn on(&self, date: NaiveDate) -> &[Holiday] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }
}
