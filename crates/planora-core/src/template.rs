//! Full-page calendar templates.
//!
//! [`build_layout`] turns a [`Template`] and a target month into a
//! [`TemplateLayout`]: the canvas size plus rectangles for the header, the
//! calendar grid and the optional photo and notes areas. Areas are carved
//! out of the page in a fixed order (photo, header, notes, grid), each one
//! shrinking what is left for the next.

use crate::color::SerializableColor;
use crate::dates::month_name;
use crate::metadata::{CalendarGridMetadata, HolidayStyle, PlannerNoteMetadata};
use crate::object::{CanvasObject, ImageProperties, TextProperties};
use crate::style::{FontSpec, FontWeight, TextAlign, VerticalAlign};
use crate::units::{Orientation, PaperSize};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Page margin, in canvas px.
pub const PAGE_PADDING: f64 = 40.0;
/// Space between stacked areas.
pub const AREA_GAP: f64 = 16.0;

/// Share of the page height taken by a top or bottom photo.
pub const PHOTO_EDGE_FRACTION: f64 = 0.32;
/// Share of the page width taken by a left or right photo.
pub const PHOTO_SIDE_FRACTION: f64 = 0.40;
/// Share of the remaining height taken by top or bottom notes.
pub const NOTES_EDGE_FRACTION: f64 = 0.22;
/// Share of the remaining width taken by left or right notes.
pub const NOTES_SIDE_FRACTION: f64 = 0.30;
/// Opacity of background artwork.
pub const BACKGROUND_OPACITY: f64 = 0.15;

/// Header height relative to its font size.
const HEADER_LINE_HEIGHT: f64 = 1.5;

/// Header text size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl HeaderSize {
    pub fn font_size(self) -> f64 {
        match self {
            HeaderSize::Small => 24.0,
            HeaderSize::Medium => 32.0,
            HeaderSize::Large => 40.0,
        }
    }
}

/// Where an optional area sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaPosition {
    #[default]
    Top,
    Left,
    Right,
    Bottom,
    /// Behind everything else, covering the page.
    Background,
}

/// What an allocated area is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaVariant {
    Photo,
    Notes,
    /// Decorative artwork: locked, not selectable, faded.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorScheme {
    pub background: SerializableColor,
    pub header: SerializableColor,
    pub accent: SerializableColor,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
            header: SerializableColor::rgb(0x1f, 0x29, 0x37),
            accent: SerializableColor::rgb(0xdc, 0x26, 0x26),
        }
    }
}

/// A named page design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub orientation: Orientation,
    pub header_size: HeaderSize,
    pub colors: ColorScheme,
    pub has_photo_area: bool,
    pub photo_position: AreaPosition,
    pub has_notes_area: bool,
    pub notes_position: AreaPosition,
    pub start_day: u8,
    pub holiday_style: HolidayStyle,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            id: "classic".to_string(),
            name: "Classic".to_string(),
            orientation: Orientation::Portrait,
            header_size: HeaderSize::Medium,
            colors: ColorScheme::default(),
            has_photo_area: false,
            photo_position: AreaPosition::Top,
            has_notes_area: false,
            notes_position: AreaPosition::Bottom,
            start_day: 0,
            holiday_style: HolidayStyle::Bar,
        }
    }
}

/// Month to lay out and optional canvas size overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub canvas_width: Option<f64>,
    #[serde(default)]
    pub canvas_height: Option<f64>,
}

impl LayoutOptions {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            month,
            year,
            canvas_width: None,
            canvas_height: None,
        }
    }

    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = Some(width);
        self.canvas_height = Some(height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayout {
    pub text: String,
    pub position: Point,
    pub size: Size,
    pub font_size: f64,
    pub color: SerializableColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLayout {
    pub position: Point,
    pub size: Size,
    pub variant: AreaVariant,
    pub opacity: f64,
    pub selectable: bool,
}

impl AreaLayout {
    fn new(rect: Rect, variant: AreaVariant) -> Self {
        let background = variant == AreaVariant::Background;
        Self {
            position: rect.origin(),
            size: rect.size(),
            variant,
            opacity: if background { BACKGROUND_OPACITY } else { 1.0 },
            selectable: !background,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Computed page geometry for one month of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    pub canvas: Size,
    pub background: SerializableColor,
    pub padding: f64,
    pub header: HeaderLayout,
    pub grid: GridLayout,
    pub photo_area: Option<AreaLayout>,
    pub notes_area: Option<AreaLayout>,
    pub month: u32,
    pub year: i32,
    pub start_day: u8,
    pub holiday_style: HolidayStyle,
    pub accent: SerializableColor,
}

fn canvas_size(template: &Template, options: &LayoutOptions) -> Size {
    let base = PaperSize::default().oriented(template.orientation).px_size();
    let pick = |value: Option<f64>, fallback: f64| match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!("ignoring invalid canvas dimension {v}");
            fallback
        }
        None => fallback,
    };
    Size::new(pick(options.canvas_width, base.width), pick(options.canvas_height, base.height))
}

/// Take a strip of `amount` from one edge of `remaining`, returning the
/// strip and shrinking `remaining` past it plus [`AREA_GAP`].
fn carve(remaining: &mut Rect, position: AreaPosition, amount: f64) -> Rect {
    let r = *remaining;
    let (strip, rest) = match position {
        AreaPosition::Top => (
            Rect::new(r.x0, r.y0, r.x1, r.y0 + amount),
            Rect::new(r.x0, r.y0 + amount + AREA_GAP, r.x1, r.y1),
        ),
        AreaPosition::Bottom => (
            Rect::new(r.x0, r.y1 - amount, r.x1, r.y1),
            Rect::new(r.x0, r.y0, r.x1, r.y1 - amount - AREA_GAP),
        ),
        AreaPosition::Left => (
            Rect::new(r.x0, r.y0, r.x0 + amount, r.y1),
            Rect::new(r.x0 + amount + AREA_GAP, r.y0, r.x1, r.y1),
        ),
        AreaPosition::Right => (
            Rect::new(r.x1 - amount, r.y0, r.x1, r.y1),
            Rect::new(r.x0, r.y0, r.x1 - amount - AREA_GAP, r.y1),
        ),
        AreaPosition::Background => (r, r),
    };
    *remaining = Rect::new(rest.x0, rest.y0, rest.x1.max(rest.x0), rest.y1.max(rest.y0));
    strip
}

/// Compute the page layout for `template` in the given month.
pub fn build_layout(template: &Template, options: &LayoutOptions) -> TemplateLayout {
    let canvas = canvas_size(template, options);
    let month = if (1..=12).contains(&options.month) {
        options.month
    } else {
        log::warn!("month {} out of range, clamping", options.month);
        options.month.clamp(1, 12)
    };

    let page = Rect::from_origin_size(Point::ZERO, canvas);
    let mut remaining = page.inset(-PAGE_PADDING);
    if remaining.width() <= 0.0 || remaining.height() <= 0.0 {
        remaining = page;
    }

    // Photos bleed to the page edge; they claim space before anything else.
    let photo_area = template.has_photo_area.then(|| match template.photo_position {
        AreaPosition::Background => AreaLayout::new(page.inset(-PAGE_PADDING / 2.0), AreaVariant::Background),
        position => {
            let amount = match position {
                AreaPosition::Top | AreaPosition::Bottom => canvas.height * PHOTO_EDGE_FRACTION,
                _ => canvas.width * PHOTO_SIDE_FRACTION,
            };
            let mut full = page;
            let strip = carve(&mut full, position, amount);
            let overlap = photo_overlap(remaining, strip, position);
            carve(&mut remaining, position, overlap);
            AreaLayout::new(strip, AreaVariant::Photo)
        }
    });

    let font_size = template.header_size.font_size();
    let header_rect = carve(&mut remaining, AreaPosition::Top, font_size * HEADER_LINE_HEIGHT);
    let header = HeaderLayout {
        text: format!("{} {}", month_name(month), options.year),
        position: header_rect.origin(),
        size: header_rect.size(),
        font_size,
        color: template.colors.header,
    };

    let notes_area = template.has_notes_area.then(|| {
        let position = match template.notes_position {
            AreaPosition::Background => {
                log::warn!("notes cannot sit in the background, placing them at the bottom");
                AreaPosition::Bottom
            }
            p => p,
        };
        let amount = match position {
            AreaPosition::Top | AreaPosition::Bottom => remaining.height() * NOTES_EDGE_FRACTION,
            _ => remaining.width() * NOTES_SIDE_FRACTION,
        };
        AreaLayout::new(carve(&mut remaining, position, amount), AreaVariant::Notes)
    });

    TemplateLayout {
        canvas,
        background: template.colors.background,
        padding: PAGE_PADDING,
        header,
        grid: GridLayout {
            position: remaining.origin(),
            size: remaining.size(),
        },
        photo_area,
        notes_area,
        month,
        year: options.year,
        start_day: template.start_day % 7,
        holiday_style: template.holiday_style,
        accent: template.colors.accent,
    }
}

/// How far a page-edge photo strip reaches into the padded content area.
fn photo_overlap(content: Rect, strip: Rect, position: AreaPosition) -> f64 {
    let reach = match position {
        AreaPosition::Top => strip.y1 - content.y0,
        AreaPosition::Bottom => content.y1 - strip.y0,
        AreaPosition::Left => strip.x1 - content.x0,
        AreaPosition::Right => content.x1 - strip.x0,
        AreaPosition::Background => 0.0,
    };
    reach.max(0.0)
}

impl TemplateLayout {
    /// Materialise the layout as canvas objects, back to front.
    pub fn into_objects(&self) -> Vec<CanvasObject> {
        let mut objects = Vec::new();

        if let Some(area) = self.photo_area {
            let mut photo = CanvasObject::image(ImageProperties::default(), area.rect());
            photo.opacity = area.opacity;
            photo.selectable = area.selectable;
            photo.locked = !area.selectable;
            let name = match area.variant {
                AreaVariant::Background => "Background",
                _ => "Photo",
            };
            objects.push(photo.with_name(name));
        }

        let header_rect = Rect::from_origin_size(self.header.position, self.header.size);
        let header = TextProperties {
            text: self.header.text.clone(),
            font: FontSpec::new(self.header.font_size, FontWeight::Bold, self.header.color),
            align: TextAlign::Center,
            valign: VerticalAlign::Middle,
            background: None,
        };
        objects.push(CanvasObject::text(header, header_rect).with_name("Header"));

        let mut grid = CalendarGridMetadata::new(self.year, self.month)
            .with_size(self.grid.size)
            .with_start_day(self.start_day);
        grid.show_title = false;
        grid.holidays.style = self.holiday_style;
        grid.holidays.color = self.accent;
        objects.push(CanvasObject::element(grid.into(), self.grid.position));

        if let Some(area) = self.notes_area {
            let notes = PlannerNoteMetadata {
                size: area.size,
                ..PlannerNoteMetadata::default()
            };
            objects.push(CanvasObject::element(notes.into(), area.position));
        }
        objects
    }
}

/// Templates shipped with the editor.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template::default(),
        Template {
            id: "photo-top".to_string(),
            name: "Photo Top".to_string(),
            has_photo_area: true,
            photo_position: AreaPosition::Top,
            ..Template::default()
        },
        Template {
            id: "notes-right".to_string(),
            name: "Notes Right".to_string(),
            header_size: HeaderSize::Small,
            has_notes_area: true,
            notes_position: AreaPosition::Right,
            start_day: 1,
            holiday_style: HolidayStyle::Dot,
            ..Template::default()
        },
        Template {
            id: "landscape-wall".to_string(),
            name: "Landscape Wall".to_string(),
            orientation: Orientation::Landscape,
            header_size: HeaderSize::Large,
            has_photo_area: true,
            photo_position: AreaPosition::Left,
            holiday_style: HolidayStyle::Background,
            ..Template::default()
        },
        Template {
            id: "watermark".to_string(),
            name: "Watermark".to_string(),
            has_photo_area: true,
            photo_position: AreaPosition::Background,
            has_notes_area: true,
            notes_position: AreaPosition::Bottom,
            holiday_style: HolidayStyle::Text,
            ..Template::default()
        },
    ]
}

pub fn find_template(id: &str) -> Option<Template> {
    builtin_templates()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id.trim()))
}
