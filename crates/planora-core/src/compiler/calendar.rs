//! Month grids, week strips and date cells.

use super::{frame, safe_len, safe_size};
use crate::color::SerializableColor;
use crate::dates::{DaySlot, MonthGrid, is_weekend, month_name, weekday_index, weekday_label, week_days};
use crate::graphics::{GraphicsTree, Primitive, Role};
use crate::holiday::{Holiday, HolidayIndex, HolidayLookup};
use crate::metadata::{
    CalendarGridMetadata, CalendarStyle, DateCellMetadata, HolidayDisplay, HolidayStyle,
    WeekStripMetadata,
};
use crate::style::{Border, FontSpec, TextAlign, VerticalAlign};
use chrono::Datelike;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Size};

/// Opacity used for tinted holiday backgrounds.
const HOLIDAY_TINT: f64 = 0.18;

/// Per-cell rendering options shared by grids, strips and tiles.
struct DayCellOptions<'a> {
    style: &'a CalendarStyle,
    display: &'a HolidayDisplay,
    highlight_weekends: bool,
    show_adjacent: bool,
}

pub(super) fn compile_month<H: HolidayLookup + ?Sized>(
    meta: &CalendarGridMetadata,
    holidays: &H,
) -> GraphicsTree {
    let size = safe_size(meta.size);
    let style = &meta.style;
    let mut tree = GraphicsTree::new();
    frame(&mut tree, size, style.background, style.border);

    let mut grid = MonthGrid::new(meta.year, meta.month, meta.start_day);
    if meta.fixed_weeks {
        grid = grid.padded_to_six_weeks();
    }

    let mut y = 0.0;
    if meta.show_title {
        let title = meta
            .title
            .clone()
            .unwrap_or_else(|| format!("{} {}", month_name(grid.month), grid.year));
        y = title_band(&mut tree, size, 0.0, meta.title_height, &title, style);
    }
    if meta.show_weekdays {
        let labels = grid
            .column_weekdays()
            .map(|w| (w, weekday_label(w, meta.weekday_format).to_string()));
        y = weekday_band(&mut tree, size, y, meta.weekday_height, &labels, style, meta.highlight_weekends);
    }

    let index = match (meta.holidays.show, grid.first_date(), grid.last_date()) {
        (true, Some(first), Some(last)) => HolidayIndex::for_range(holidays, first, last),
        _ => HolidayIndex::default(),
    };

    let body = Rect::new(0.0, y, size.width, size.height.max(y));
    let rows = grid.weeks.len().max(1);
    let cell_w = body.width() / 7.0;
    let cell_h = body.height() / rows as f64;
    let options = DayCellOptions {
        style,
        display: &meta.holidays,
        highlight_weekends: meta.highlight_weekends,
        show_adjacent: meta.show_adjacent_days,
    };

    for (r, week) in grid.weeks.iter().enumerate() {
        for (c, slot) in week.iter().enumerate() {
            let cell = Rect::new(
                c as f64 * cell_w,
                body.y0 + r as f64 * cell_h,
                (c + 1) as f64 * cell_w,
                body.y0 + (r + 1) as f64 * cell_h,
            );
            day_cell(&mut tree, cell, slot, index.on(slot.date), &options);
        }
    }

    grid_lines(&mut tree, body, 7, rows, style.grid);
    tree
}

pub(super) fn compile_week<H: HolidayLookup + ?Sized>(
    meta: &WeekStripMetadata,
    holidays: &H,
) -> GraphicsTree {
    let size = safe_size(meta.size);
    let style = &meta.style;
    let mut tree = GraphicsTree::new();
    frame(&mut tree, size, style.background, style.border);

    let days = week_days(meta.start_date, meta.start_day);
    let mut y = 0.0;
    if meta.show_title {
        let first = days[0].date;
        let title = meta.title.clone().unwrap_or_else(|| {
            format!("Week of {} {}, {}", month_name(first.month()), first.day(), first.year())
        });
        y = title_band(&mut tree, size, 0.0, meta.title_height, &title, style);
    }
    if meta.show_weekdays {
        let labels = days.map(|d| (d.weekday, weekday_label(d.weekday, meta.weekday_format).to_string()));
        y = weekday_band(&mut tree, size, y, meta.weekday_height, &labels, style, meta.highlight_weekends);
    }

    let index = if meta.holidays.show {
        HolidayIndex::for_range(holidays, days[0].date, days[6].date)
    } else {
        HolidayIndex::default()
    };

    let body = Rect::new(0.0, y, size.width, size.height.max(y));
    let cell_w = body.width() / 7.0;
    // Every day of the strip counts as "current" so none are greyed out.
    let options = DayCellOptions {
        style,
        display: &meta.holidays,
        highlight_weekends: meta.highlight_weekends,
        show_adjacent: true,
    };

    for (c, slot) in days.iter().enumerate() {
        let cell = Rect::new(c as f64 * cell_w, body.y0, (c + 1) as f64 * cell_w, body.y1);
        let slot = DaySlot {
            is_current_month: true,
            ..*slot
        };
        day_cell(&mut tree, cell, &slot, index.on(slot.date), &options);

        if meta.time_slots > 0 && style.grid.is_visible() {
            let lead = style.day_font.size * 1.6;
            let top = (cell.y0 + lead).min(cell.y1);
            let step = (cell.y1 - top) / meta.time_slots as f64;
            let pad = style.cell_padding.min(cell.width() / 2.0);
            for i in 1..=meta.time_slots {
                let ly = top + step * i as f64 - step / 2.0;
                tree.push(Primitive::line(
                    Point::new(cell.x0 + pad, ly),
                    Point::new(cell.x1 - pad, ly),
                    style.grid,
                    Role::Body,
                ));
            }
        }
    }

    grid_lines(&mut tree, body, 7, 1, style.grid);
    tree
}

pub(super) fn compile_date_cell<H: HolidayLookup + ?Sized>(
    meta: &DateCellMetadata,
    holidays: &H,
) -> GraphicsTree {
    let size = safe_size(meta.size);
    let style = &meta.style;
    let mut tree = GraphicsTree::new();
    frame(&mut tree, size, style.background, style.border);

    let cell = Rect::from_origin_size((0.0, 0.0), size);
    let pad = safe_len(style.cell_padding, 0.0).min(size.width / 2.0).min(size.height / 2.0);
    let inner = cell.inset(-pad);
    let band = inner.height() * 0.2;
    let date = meta.date;
    let weekday = weekday_index(date);

    let index = if meta.holidays.show {
        HolidayIndex::for_range(holidays, date, date)
    } else {
        HolidayIndex::default()
    };
    let holiday = index.first_on(date);
    let holiday_color = holiday.map(|h| h.color.unwrap_or(meta.holidays.color));

    if let (Some(color), HolidayStyle::Background) = (holiday_color, meta.holidays.style) {
        tree.push(Primitive::rect(cell, Some(color.faded(HOLIDAY_TINT)), None, Role::Marker));
    }

    if meta.show_month {
        tree.push(Primitive::text(
            Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + band),
            format!("{} {}", month_name(date.month()), date.year()),
            &style.weekday_font,
            TextAlign::Center,
            VerticalAlign::Top,
            Role::Header,
        ));
    }

    let number_color = match (holiday_color, meta.holidays.style) {
        (Some(color), HolidayStyle::Text) => color,
        _ if is_weekend(weekday) => style.weekend_color,
        _ => style.day_font.color,
    };
    tree.push(Primitive::text(
        Rect::new(inner.x0, inner.y0 + band, inner.x1, inner.y1 - band),
        date.day().to_string(),
        &style.day_font.clone().with_color(number_color),
        TextAlign::Center,
        VerticalAlign::Middle,
        Role::Body,
    ));

    let mut bottom = inner.y1;
    if meta.show_weekday {
        tree.push(Primitive::text(
            Rect::new(inner.x0, bottom - band, inner.x1, bottom),
            weekday_label(weekday, meta.weekday_format),
            &style.weekday_font,
            TextAlign::Center,
            VerticalAlign::Bottom,
            Role::Label,
        ));
        bottom -= band;
    }

    if let (Some(holiday), Some(color)) = (holiday, holiday_color) {
        if meta.holidays.show_names {
            tree.push(Primitive::text(
                Rect::new(inner.x0, (bottom - band).max(inner.y0), inner.x1, bottom),
                holiday.name.clone(),
                &name_font(style, color),
                TextAlign::Center,
                VerticalAlign::Bottom,
                Role::Label,
            ));
        }
        if let Some(marker) = holiday_marker(meta.holidays.style, cell, color, pad) {
            tree.push(marker);
        }
    }
    tree
}

/// Title band at `top`. Returns the y where the next band starts.
fn title_band(
    tree: &mut GraphicsTree,
    size: Size,
    top: f64,
    height: f64,
    title: &str,
    style: &CalendarStyle,
) -> f64 {
    let bottom = (top + safe_len(height, 0.0)).min(size.height);
    let band = Rect::new(0.0, top, size.width, bottom);
    if let Some(background) = style.title_background {
        tree.push(Primitive::rect(band, Some(background), None, Role::Header));
    }
    let pad = style.cell_padding.clamp(0.0, size.width / 2.0);
    tree.push(Primitive::text(
        Rect::new(pad, top, size.width - pad, bottom),
        title,
        &style.title_font,
        TextAlign::Center,
        VerticalAlign::Middle,
        Role::Header,
    ));
    bottom
}

/// Weekday label row. `labels` pairs each column's weekday with its label.
fn weekday_band(
    tree: &mut GraphicsTree,
    size: Size,
    top: f64,
    height: f64,
    labels: &[(u8, String); 7],
    style: &CalendarStyle,
    highlight_weekends: bool,
) -> f64 {
    let bottom = (top + safe_len(height, 0.0)).min(size.height);
    if let Some(background) = style.weekday_background {
        tree.push(Primitive::rect(
            Rect::new(0.0, top, size.width, bottom),
            Some(background),
            None,
            Role::Label,
        ));
    }
    let col_w = size.width / 7.0;
    for (c, (weekday, label)) in labels.iter().enumerate() {
        let font = if highlight_weekends && is_weekend(*weekday) {
            style.weekday_font.clone().with_color(style.weekend_color)
        } else {
            style.weekday_font.clone()
        };
        tree.push(Primitive::text(
            Rect::new(c as f64 * col_w, top, (c + 1) as f64 * col_w, bottom),
            label.clone(),
            &font,
            TextAlign::Center,
            VerticalAlign::Middle,
            Role::Label,
        ));
    }
    bottom
}

fn day_cell(
    tree: &mut GraphicsTree,
    cell: Rect,
    slot: &DaySlot,
    holidays: &[Holiday],
    options: &DayCellOptions<'_>,
) {
    if !slot.is_current_month && !options.show_adjacent {
        return;
    }
    let style = options.style;
    let display = options.display;
    let color = holidays.first().map(|h| h.color.unwrap_or(display.color));
    let pad = safe_len(style.cell_padding, 0.0)
        .min(cell.width() / 2.0)
        .min(cell.height() / 2.0);

    if let (Some(color), HolidayStyle::Background) = (color, display.style) {
        tree.push(Primitive::rect(cell, Some(color.faded(HOLIDAY_TINT)), None, Role::Marker));
    }

    let number_color = if !slot.is_current_month {
        style.adjacent_color
    } else {
        match (color, display.style) {
            (Some(color), HolidayStyle::Text) => color,
            _ if options.highlight_weekends && is_weekend(slot.weekday) => style.weekend_color,
            _ => style.day_font.color,
        }
    };
    let inner = cell.inset(-pad);
    tree.push(Primitive::text(
        inner,
        slot.day().to_string(),
        &style.day_font.clone().with_color(number_color),
        TextAlign::Left,
        VerticalAlign::Top,
        Role::Body,
    ));

    if let Some(color) = color {
        if display.show_names {
            let name_top = (inner.y0 + style.day_font.size * 1.3).min(inner.y1);
            tree.push(Primitive::text(
                Rect::new(inner.x0, name_top, inner.x1, inner.y1),
                holidays.iter().map(|h| h.name.as_str()).collect::<Vec<_>>().join(", "),
                &name_font(style, color),
                TextAlign::Left,
                VerticalAlign::Top,
                Role::Label,
            ));
        }
        if let Some(marker) = holiday_marker(display.style, cell, color, pad) {
            tree.push(marker);
        }
    }
}

fn name_font(style: &CalendarStyle, color: SerializableColor) -> FontSpec {
    FontSpec {
        size: style.day_font.size * 0.6,
        ..style.day_font.clone().with_color(color)
    }
}

/// Marker geometry for a holiday inside `cell`.
///
/// `Background` and `Text` styles are expressed through the cell fill and
/// the day number colour and have no separate marker.
pub fn holiday_marker(
    style: HolidayStyle,
    cell: Rect,
    color: SerializableColor,
    padding: f64,
) -> Option<Primitive> {
    let unit = cell.width().min(cell.height()).max(0.0) * 0.12;
    let corner = Point::new(cell.x1 - padding, cell.y0 + padding);
    match style {
        HolidayStyle::Background | HolidayStyle::Text => None,
        HolidayStyle::Bar => {
            let thickness = unit * 0.5;
            Some(Primitive::rect(
                Rect::new(
                    cell.x0 + padding,
                    cell.y1 - padding - thickness,
                    cell.x1 - padding,
                    cell.y1 - padding,
                ),
                Some(color),
                None,
                Role::Marker,
            ))
        }
        HolidayStyle::Dot => {
            let r = unit / 2.0;
            let path = Circle::new(Point::new(corner.x - r, corner.y + r), r).to_path(0.1);
            Some(Primitive::Path {
                path,
                fill: Some(color),
                stroke: None,
                role: Role::Marker,
            })
        }
        HolidayStyle::Square => Some(Primitive::rect(
            Rect::new(corner.x - unit, corner.y, corner.x, corner.y + unit),
            Some(color),
            None,
            Role::Marker,
        )),
        HolidayStyle::Border => {
            let width = (unit * 0.25).max(f64::EPSILON);
            let half = width / 2.0;
            Some(Primitive::rect(
                cell.inset(-half),
                None,
                Some(Border::new(color, width)),
                Role::Marker,
            ))
        }
        HolidayStyle::Triangle => {
            let side = unit * 1.5;
            let mut path = BezPath::new();
            path.move_to(Point::new(cell.x1 - side, cell.y0));
            path.line_to(Point::new(cell.x1, cell.y0));
            path.line_to(Point::new(cell.x1, cell.y0 + side));
            path.close_path();
            Some(Primitive::Path {
                path,
                fill: Some(color),
                stroke: None,
                role: Role::Marker,
            })
        }
    }
}

/// Inner grid lines of a `columns` × `rows` body.
fn grid_lines(tree: &mut GraphicsTree, body: Rect, columns: usize, rows: usize, stroke: Border) {
    if !stroke.is_visible() || body.height() <= 0.0 {
        return;
    }
    let cell_w = body.width() / columns as f64;
    let cell_h = body.height() / rows as f64;
    for r in 0..rows {
        let y = body.y0 + r as f64 * cell_h;
        tree.push(Primitive::line(Point::new(body.x0, y), Point::new(body.x1, y), stroke, Role::Grid));
    }
    for c in 1..columns {
        let x = body.x0 + c as f64 * cell_w;
        tree.push(Primitive::line(Point::new(x, body.y0), Point::new(x, body.y1), stroke, Role::Grid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::HolidayTable;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn day_numbers(tree: &GraphicsTree) -> Vec<String> {
        tree.with_role(Role::Body)
            .filter_map(|p| p.text_content().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_month_grid_cells() {
        // January 2024 starts on a Monday: one leading overflow day with a
        // Sunday start, five weeks in total.
        let meta = CalendarGridMetadata::new(2024, 1);
        let tree = compile_month(&meta, &crate::holiday::NoHolidays);
        let numbers = day_numbers(&tree);
        assert_eq!(numbers.len(), 35);
        assert_eq!(numbers[0], "31");
        assert_eq!(numbers[1], "1");

        let title: Vec<_> = tree.with_role(Role::Header).filter_map(|p| p.text_content()).collect();
        assert_eq!(title, vec!["January 2024"]);
    }

    #[test]
    fn test_start_day_changes_columns() {
        let meta = CalendarGridMetadata::new(2024, 1).with_start_day(1);
        let tree = compile_month(&meta, &crate::holiday::NoHolidays);
        let labels: Vec<_> = tree.with_role(Role::Label).filter_map(|p| p.text_content()).collect();
        assert_eq!(labels[0], "Mon");
        assert_eq!(day_numbers(&tree)[0], "1");
    }

    #[test]
    fn test_hidden_adjacent_days_are_blank() {
        let meta = CalendarGridMetadata {
            show_adjacent_days: false,
            ..CalendarGridMetadata::new(2024, 1)
        };
        let tree = compile_month(&meta, &crate::holiday::NoHolidays);
        assert_eq!(day_numbers(&tree).len(), 31);
    }

    #[test]
    fn test_fixed_weeks_always_six_rows() {
        let meta = CalendarGridMetadata {
            fixed_weeks: true,
            ..CalendarGridMetadata::new(2024, 1)
        };
        let tree = compile_month(&meta, &crate::holiday::NoHolidays);
        assert_eq!(day_numbers(&tree).len(), 42);
    }

    #[test]
    fn test_holiday_markers_per_style() {
        let table = HolidayTable(vec![Holiday::new(d(2024, 1, 1), "New Year's Day")]);
        for style in HolidayStyle::all() {
            let mut meta = CalendarGridMetadata::new(2024, 1);
            meta.holidays.style = *style;
            let tree = compile_month(&meta, &table);
            let markers = tree.with_role(Role::Marker).count();
            let expected = usize::from(*style != HolidayStyle::Text);
            assert_eq!(markers, expected, "{style:?}");
        }
    }

    #[test]
    fn test_holidays_hidden_when_disabled() {
        let table = HolidayTable(vec![Holiday::new(d(2024, 1, 1), "New Year's Day")]);
        let mut meta = CalendarGridMetadata::new(2024, 1);
        meta.holidays.show = false;
        let tree = compile_month(&meta, &table);
        assert_eq!(tree.with_role(Role::Marker).count(), 0);
    }

    #[test]
    fn test_overflow_days_query_adjacent_year() {
        let lookup = |year: i32| -> Vec<Holiday> {
            if year == 2023 {
                vec![Holiday::new(d(2023, 12, 31), "New Year's Eve")]
            } else {
                Vec::new()
            }
        };
        let meta = CalendarGridMetadata::new(2024, 1);
        let tree = compile_month(&meta, &lookup);
        assert_eq!(tree.with_role(Role::Marker).count(), 1);
    }

    #[test]
    fn test_holiday_text_style_colors_number() {
        let red = SerializableColor::rgb(255, 0, 0);
        let table = HolidayTable(vec![Holiday {
            color: Some(red),
            ..Holiday::new(d(2024, 1, 10), "Custom")
        }]);
        let mut meta = CalendarGridMetadata::new(2024, 1);
        meta.holidays.style = HolidayStyle::Text;
        let tree = compile_month(&meta, &table);
        let tenth = tree
            .with_role(Role::Body)
            .find(|p| p.text_content() == Some("10"))
            .unwrap();
        let Primitive::Text { font, .. } = tenth else {
            panic!("expected text");
        };
        assert_eq!(font.color, red);
    }

    #[test]
    fn test_marker_geometry_stays_in_cell() {
        let cell = Rect::new(10.0, 10.0, 110.0, 90.0);
        for style in HolidayStyle::all() {
            if let Some(marker) = holiday_marker(*style, cell, SerializableColor::black(), 4.0) {
                let b = marker.bounds();
                assert!(b.x0 >= cell.x0 - 1e-9 && b.x1 <= cell.x1 + 1e-9, "{style:?}");
                assert!(b.y0 >= cell.y0 - 1e-9 && b.y1 <= cell.y1 + 1e-9, "{style:?}");
            }
        }
    }

    #[test]
    fn test_week_strip_aligns_to_start_day() {
        let meta = WeekStripMetadata {
            start_date: d(2025, 1, 8),
            start_day: 1,
            ..WeekStripMetadata::default()
        };
        let tree = compile_week(&meta, &crate::holiday::NoHolidays);
        assert_eq!(day_numbers(&tree), vec!["6", "7", "8", "9", "10", "11", "12"]);
        let title: Vec<_> = tree.with_role(Role::Header).filter_map(|p| p.text_content()).collect();
        assert_eq!(title, vec!["Week of January 6, 2025"]);
    }

    #[test]
    fn test_week_strip_time_slots() {
        let meta = WeekStripMetadata {
            time_slots: 3,
            ..WeekStripMetadata::default()
        };
        let tree = compile_week(&meta, &crate::holiday::NoHolidays);
        let slot_lines = tree
            .with_role(Role::Body)
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count();
        assert_eq!(slot_lines, 21);
    }

    #[test]
    fn test_date_cell_shows_holiday_name() {
        let table = HolidayTable(vec![Holiday::new(d(2025, 1, 1), "New Year's Day")]);
        let meta = DateCellMetadata::default();
        let tree = compile_date_cell(&meta, &table);
        let texts: Vec<_> = tree.iter().filter_map(|p| p.text_content()).collect();
        assert!(texts.contains(&"1"));
        assert!(texts.contains(&"January 2025"));
        assert!(texts.contains(&"Wednesday"));
        assert!(texts.contains(&"New Year's Day"));
    }
}
